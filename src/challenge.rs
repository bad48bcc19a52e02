//! # Challenge Tokens
//!
//! A request to [`CHALLENGE_PATH`] lets a monitoring client check that the
//! site's production host and its configured key belong together. The answer
//! is one SHA-256 digest per key, hex-encoded and space-separated in the
//! [`CHALLENGE_HEADER`] response header.
//!
//! The token is only produced when the forwarded host equals the configured
//! `cdn.prod.host`. Any mismatch, or missing key material, yields no token,
//! never an error.

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::SiteConfig;

/// Reserved request path that asks for a challenge token
pub const CHALLENGE_PATH: &str = "/_rum-challenge";

/// Response header carrying the tokens
pub const CHALLENGE_HEADER: &str = "x-rum-challenge";

/// Lowercase hex SHA-256 of `host` immediately followed by `key`
#[must_use]
pub fn challenge_digest(host: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(host.as_bytes());
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Tokens for `forwarded_host`, in key order
///
/// `domainkey` is used when it holds at least one key, otherwise `slack`.
#[must_use]
pub fn compute_challenge_tokens(config: &SiteConfig, forwarded_host: Option<&str>) -> Vec<String> {
    let (Some(prod_host), Some(host)) = (config.prod_host.as_deref(), forwarded_host) else {
        return Vec::new();
    };
    if prod_host != host {
        debug!(prod_host, forwarded_host = host, "Challenge host mismatch");
        return Vec::new();
    }

    let keys = if config.domainkey.is_empty() {
        &config.slack
    } else {
        &config.domainkey
    };
    keys.iter().map(|key| challenge_digest(prod_host, key)).collect()
}

/// Tokens joined into a header value, or `None` when there are none
#[must_use]
pub fn challenge_header_value(config: &SiteConfig, forwarded_host: Option<&str>) -> Option<String> {
    let tokens = compute_challenge_tokens(config, forwarded_host);
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}
