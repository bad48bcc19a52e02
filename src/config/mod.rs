//! # Remote Config Loader
//!
//! Two tiers of JSON configuration drive the preflight decision:
//!
//! 1. **Code config** - `{owner}/{repo}/{ref}/helix-config.json` in the code
//!    bus. Only the root `contentBusId` is consulted.
//! 2. **Site config** - `{contentBusId}/{partition}/.helix/config-all.json`
//!    in the content bus, falling back to the legacy
//!    `{contentBusId}/{partition}/metadata.json`.
//!
//! Store outcomes map onto [`PipelineError`](crate::error::PipelineError)
//! variants:
//!
//! | Tier | Found, bad JSON | Not found        | Store error |
//! |------|-----------------|------------------|-------------|
//! | code | `Parse` (400)   | `NotFound` (404) | `Internal` (500) |
//! | site | `Parse` (400)   | `Ok(None)`       | `Upstream` (502) |

mod code;
mod site;

pub use code::{load_code_config, CodeConfig};
pub use site::{load_site_config, SiteConfig};
