//! # CLI Module
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Run the preflight service until SIGINT/SIGTERM:
//!
//! ```bash
//! edge-preflight serve --config preflight.yaml --bind 127.0.0.1:8080
//! ```
//!
//! Logging is configured through `PREFLIGHT_LOG_*` variables (see
//! [`crate::logging`]) and the coroutine stack through `PREFLIGHT_STACK_SIZE`.
//!
//! ### `resolve`
//!
//! Answer one request against the configured store and print the result,
//! without starting a server:
//!
//! ```bash
//! edge-preflight resolve --config preflight.yaml \
//!     --owner acme --repo website --ref main \
//!     --path /blog/post \
//!     -H access-control-request-headers:content-type
//! ```
//!
//! ```json
//! {
//!   "status": 204,
//!   "headers": {
//!     "access-control-allow-headers": "content-type",
//!     "access-control-max-age": "86400"
//!   }
//! }
//! ```

mod commands;


pub use commands::{parse_header, run_cli, start_service, Cli, Commands};
