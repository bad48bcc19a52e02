use std::collections::HashMap;

use super::{LoadOutcome, ObjectLoader};

/// In-memory loader with canned replies
///
/// Keys that were never registered load as [`LoadOutcome::NotFound`].
/// Registering the same bucket/key twice replaces the earlier reply.
///
/// ```
/// use edge_preflight::loader::{LoadOutcome, MemoryLoader, ObjectLoader};
///
/// let loader = MemoryLoader::new()
///     .reply("helix-code-bus", "owner/repo/ref/helix-config.json", LoadOutcome::found("{}"))
///     .reply("helix-content-bus", "bus/live/metadata.json", LoadOutcome::failed("bang!"));
///
/// assert_eq!(loader.load("helix-code-bus", "nope"), LoadOutcome::NotFound);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    replies: HashMap<(String, String), LoadOutcome>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the outcome for `bucket`/`key`
    pub fn reply(mut self, bucket: &str, key: &str, outcome: LoadOutcome) -> Self {
        self.insert(bucket, key, outcome);
        self
    }

    /// Register the outcome for `bucket`/`key` in place
    pub fn insert(&mut self, bucket: &str, key: &str, outcome: LoadOutcome) {
        self.replies
            .insert((bucket.to_string(), key.to_string()), outcome);
    }

    /// Number of registered replies
    #[must_use]
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

impl ObjectLoader for MemoryLoader {
    fn load(&self, bucket: &str, key: &str) -> LoadOutcome {
        self.replies
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .unwrap_or(LoadOutcome::NotFound)
    }
}
