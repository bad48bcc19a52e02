//! # edge-preflight
//!
//! **edge-preflight** answers CORS preflight (`OPTIONS`) requests for sites whose
//! configuration lives in object storage. It runs on the `may` coroutine
//! runtime and serves HTTP through `may_minihttp`.
//!
//! ## Overview
//!
//! For every request the service looks up two JSON documents:
//!
//! 1. the **code config** of the site (`helix-config.json` in the code bus),
//!    which names the site's content namespace (`contentBusId`)
//! 2. the **site config** in that namespace (`.helix/config-all.json`, or the
//!    legacy `metadata.json`), which holds per-path header rules and the
//!    challenge key material
//!
//! and answers `204 No Content` with the headers that apply to the request
//! path. Failures are reported through an `x-error` header, never a body.
//!
//! ## Architecture
//!
//! - **[`loader`]** - object store access ([`loader::ObjectLoader`]) with memory,
//!   filesystem and HTTP implementations
//! - **[`config`]** - decoding of the code and site config documents
//! - **[`rules`]** - glob path patterns and header rule merging
//! - **[`challenge`]** - challenge token digests for the `/_rum-challenge` probe
//! - **[`pipeline`]** - the request/response types and [`pipeline::OptionsPipe`]
//! - **[`server`]** - `may_minihttp` adapter, site resolution from host names
//! - **[`settings`]** - YAML service configuration
//! - **[`logging`]** / **[`runtime_config`]** - ambient setup from the environment
//! - **[`cli`]** - `serve` and `resolve` commands
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Service as server::PreflightService
//!     participant Pipe as pipeline::OptionsPipe
//!     participant Store as loader::ObjectLoader
//!
//!     Client->>Service: OPTIONS /path (Host: ref--repo--owner.hlx.live)
//!     Service->>Service: resolve SiteIdentity
//!     Service->>Pipe: respond(site, request)
//!     Pipe->>Store: load(code bus, owner/repo/ref/helix-config.json)
//!     Store-->>Pipe: Found | NotFound | Failed
//!     Pipe->>Store: load(content bus, {contentBusId}/{partition}/.helix/config-all.json)
//!     Store-->>Pipe: Found | NotFound | Failed
//!     alt path is /_rum-challenge
//!         Pipe->>Pipe: challenge tokens
//!     else
//!         Pipe->>Pipe: match_rules + merge_headers
//!     end
//!     Pipe-->>Service: PreflightResponse
//!     Service-->>Client: 204 + headers (or error status + x-error)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use edge_preflight::loader::{Buckets, LoadOutcome, MemoryLoader};
//! use edge_preflight::pipeline::{OptionsPipe, PreflightRequest};
//! use edge_preflight::site::SiteIdentity;
//!
//! let loader = MemoryLoader::new()
//!     .reply(
//!         "helix-code-bus",
//!         "acme/website/main/helix-config.json",
//!         LoadOutcome::found(r#"{"content":{"/":{"contentBusId":"bus"}}}"#),
//!     )
//!     .reply(
//!         "helix-content-bus",
//!         "bus/live/.helix/config-all.json",
//!         LoadOutcome::found(
//!             r#"{"headers":{"data":{"/**":[{"key":"access-control-allow-origin","value":"*"}]}}}"#,
//!         ),
//!     );
//!
//! let pipe = OptionsPipe::new(Arc::new(loader), Buckets::default());
//! let site = SiteIdentity::new("acme", "website", "main", "live");
//! let res = pipe.respond(&site, &PreflightRequest::options("/index.html"));
//!
//! assert_eq!(res.status, 204);
//! assert_eq!(res.get_header("access-control-allow-origin"), Some("*"));
//! assert_eq!(res.get_header("access-control-max-age"), Some("86400"));
//! ```

pub mod challenge;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod rules;
pub mod runtime_config;
pub mod server;
pub mod settings;
pub mod site;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{OptionsPipe, PreflightRequest, PreflightResponse};
pub use site::SiteIdentity;
