//! HTTP front end: adapts `may_minihttp` requests to the preflight pipeline.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{build_request, parse_request};
pub use response::write_preflight_response;
pub use service::{health_endpoint, PreflightService};
