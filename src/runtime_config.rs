//! # Runtime Configuration
//!
//! Coroutine tuning read from the environment at startup.
//!
//! ### `PREFLIGHT_STACK_SIZE`
//!
//! Stack size for request coroutines, decimal (`16384`) or hex (`0x4000`).
//! Default: `0x4000` (16 KB). A preflight never recurses deeply, so the
//! default is enough unless a custom loader needs more.
//!
//! ```rust
//! use edge_preflight::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

/// Stack size used when the variable is unset or invalid
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            stack_size: env::var("PREFLIGHT_STACK_SIZE")
                .ok()
                .and_then(|v| parse_stack_size(&v))
                .unwrap_or(DEFAULT_STACK_SIZE),
        }
    }

    /// Apply to the `may` scheduler; call before any coroutine is spawned
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let size = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok()?,
        None => val.parse().ok()?,
    };
    (size > 0).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("0x8000"), Some(0x8000));
        assert_eq!(parse_stack_size("32768"), Some(32768));
        assert_eq!(parse_stack_size("0"), None);
        assert_eq!(parse_stack_size("lots"), None);
    }
}
