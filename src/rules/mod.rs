//! # Header Rules
//!
//! Sites attach response headers to paths through a mapping of glob pattern →
//! list of `{key, value}` rules. Resolving the headers for a request is two
//! steps:
//!
//! 1. [`match_rules`] - test every pattern, in declaration order, and collect
//!    the rules of each match
//! 2. [`merge_headers`] - fold the collected rules into one mapping, last
//!    write wins per (lower-cased) header name
//!
//! Precedence is purely declaration order. A later pattern overrides an
//! earlier one for the same header, regardless of which pattern is more
//! specific.

mod merge;
mod pattern;

pub use merge::merge_headers;
pub use pattern::PathPattern;

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;

/// One header directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRule {
    pub key: String,
    pub value: String,
}

impl HeaderRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Rules attached to one path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub pattern: PathPattern,
    pub rules: Vec<HeaderRule>,
}

impl RuleSet {
    pub fn new(pattern: &str, rules: Vec<HeaderRule>) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
            rules,
        }
    }
}

/// Collect the rules of every pattern matching `path`, in declaration order
///
/// An empty result is a valid outcome: the path simply has no extra headers.
#[must_use]
pub fn match_rules<'a>(config: &'a SiteConfig, path: &str) -> Vec<&'a HeaderRule> {
    config
        .header_rules
        .iter()
        .filter(|set| set.pattern.matches(path))
        .flat_map(|set| set.rules.iter())
        .collect()
}
