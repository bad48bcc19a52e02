//! Site identity and the store keys derived from it.

use serde::{Deserialize, Serialize};

/// Partition used when none is configured
pub const DEFAULT_PARTITION: &str = "live";

/// Identifies which code/content namespace a request reads from
///
/// Supplied by the caller per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIdentity {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default = "default_partition")]
    pub partition: String,
}

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

impl SiteIdentity {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        git_ref: impl Into<String>,
        partition: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            git_ref: git_ref.into(),
            partition: partition.into(),
        }
    }

    /// Derive an identity from a `{ref}--{repo}--{owner}.{suffix}` host name
    ///
    /// The port, if any, is ignored. Returns `None` for hosts that do not
    /// follow the convention (custom production domains, `localhost`, ...).
    #[must_use]
    pub fn from_host(host: &str, partition: &str) -> Option<Self> {
        let host = host.split(':').next()?;
        let (label, suffix) = host.split_once('.')?;
        if suffix.is_empty() {
            return None;
        }
        let mut parts = label.split("--");
        let git_ref = parts.next()?;
        let repo = parts.next()?;
        let owner = parts.next()?;
        if parts.next().is_some() || [git_ref, repo, owner].iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self::new(owner, repo, git_ref, partition))
    }

    /// Code bus key of the site's `helix-config.json`
    #[must_use]
    pub fn code_config_key(&self) -> String {
        format!("{}/{}/{}/helix-config.json", self.owner, self.repo, self.git_ref)
    }
}
