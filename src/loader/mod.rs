//! # Object Loaders
//!
//! The pipeline reads configuration from two object-storage namespaces, the
//! *code bus* and the *content bus*. It never talks to a storage backend
//! directly: every read goes through the [`ObjectLoader`] trait and comes back
//! as a [`LoadOutcome`].
//!
//! ## Implementations
//!
//! - [`MemoryLoader`] - canned replies, used by tests and the `resolve` command
//! - [`FsLoader`] - `{root}/{bucket}/{key}` on the local filesystem
//! - [`HttpLoader`] - blocking GET against an object gateway
//!
//! Retries and timeouts are the loader's business; the pipeline maps whatever
//! outcome it gets and never retries.

mod fs;
mod gateway;
mod memory;

pub use fs::FsLoader;
pub use gateway::HttpLoader;
pub use memory::MemoryLoader;

use serde::{Deserialize, Serialize};

/// Default name of the bucket holding `helix-config.json`
pub const CODE_BUS: &str = "helix-code-bus";
/// Default name of the bucket holding `config-all.json` / `metadata.json`
pub const CONTENT_BUS: &str = "helix-content-bus";

/// Result of a single store read
///
/// "Not found" is an expected outcome, not an error, so it gets its own
/// variant instead of being folded into `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The object exists; raw bytes
    Found(Vec<u8>),
    /// The object does not exist
    NotFound,
    /// The store failed; human-readable cause
    Failed(String),
}

impl LoadOutcome {
    /// Convenience constructor for a found object
    pub fn found(body: impl Into<Vec<u8>>) -> Self {
        LoadOutcome::Found(body.into())
    }

    /// Convenience constructor for a store failure
    pub fn failed(cause: impl Into<String>) -> Self {
        LoadOutcome::Failed(cause.into())
    }
}

/// Read access to the object store
///
/// Implementations are shared across coroutines as `Arc<dyn ObjectLoader>`
/// and must be safe to call concurrently.
pub trait ObjectLoader: Send + Sync {
    /// Fetch `key` from `bucket`
    fn load(&self, bucket: &str, key: &str) -> LoadOutcome;
}

/// Names of the two buckets the pipeline reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    #[serde(default = "default_code_bucket")]
    pub code: String,
    #[serde(default = "default_content_bucket")]
    pub content: String,
}

fn default_code_bucket() -> String {
    CODE_BUS.to_string()
}

fn default_content_bucket() -> String {
    CONTENT_BUS.to_string()
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            code: default_code_bucket(),
            content: default_content_bucket(),
        }
    }
}
