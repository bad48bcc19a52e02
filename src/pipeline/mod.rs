//! # Preflight Pipeline
//!
//! [`OptionsPipe`] turns one [`PreflightRequest`] for one
//! [`SiteIdentity`](crate::site::SiteIdentity) into a [`PreflightResponse`]:
//!
//! ```text
//! load code config -> load site config -> challenge path?
//!                                           yes: challenge token
//!                                           no:  match + merge header rules
//!                                        -> 204 with headers
//! ```
//!
//! Any failure on the way short-circuits into an error response; see
//! [`PipelineError`](crate::error::PipelineError) for the mapping.

mod core;
mod options;

pub use self::core::{upsert_header, HeaderVec, PreflightRequest, PreflightResponse, MAX_INLINE_HEADERS};
pub use options::{OptionsPipe, PREFLIGHT_MAX_AGE};
