use std::fmt;

/// Value sent in `cache-control` on responses that must never be cached.
pub const NO_STORE: &str = "no-store, private, must-revalidate";

/// Request-scoped pipeline failure
///
/// Every failure is terminal for the request. The responder turns it into a
/// status code and an `x-error` header via [`PipelineError::status`] and
/// [`PipelineError::message`]; nothing is ever written to the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A configuration object is absent from the store
    NotFound {
        /// Store key as shown to clients (e.g. `/helix-config.json`)
        key: String,
    },
    /// A configuration object was found but is not valid JSON
    Parse {
        /// Store key as shown to clients
        key: String,
        /// Decoder message
        cause: String,
    },
    /// A configuration object decoded but lacks a required field
    Validation(String),
    /// The store failed while fetching the code config
    ///
    /// The message is the store's own, passed through verbatim.
    Internal(String),
    /// The store failed while fetching the site config
    Upstream {
        /// Store key as shown to clients
        key: String,
        /// Store message
        cause: String,
    },
    /// The request is not a preflight request
    MethodNotAllowed,
    /// No site identity could be derived for the request
    UnknownSite,
}

impl PipelineError {
    /// HTTP status this failure maps to
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::NotFound { .. } => 404,
            PipelineError::Parse { .. } => 400,
            PipelineError::Validation(_) => 400,
            PipelineError::Internal(_) => 500,
            PipelineError::Upstream { .. } => 502,
            PipelineError::MethodNotAllowed => 405,
            PipelineError::UnknownSite => 400,
        }
    }

    /// Whether the error response must carry `cache-control: no-store`
    ///
    /// Client errors caused by the stored content (bad JSON, missing fields)
    /// may be cached; store outages and misses may not.
    #[must_use]
    pub fn is_uncacheable(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound { .. }
                | PipelineError::Internal(_)
                | PipelineError::Upstream { .. }
        )
    }

    /// Text for the `x-error` response header
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NotFound { key } => write!(f, "unable to load {}: 404", key),
            PipelineError::Parse { key, cause } => {
                write!(f, "failed parsing of {}: {}", key, cause)
            }
            PipelineError::Validation(msg) => f.write_str(msg),
            PipelineError::Internal(msg) => f.write_str(msg),
            PipelineError::Upstream { key, cause } => {
                write!(f, "unable to load {}: {}", key, cause)
            }
            PipelineError::MethodNotAllowed => f.write_str("method not allowed"),
            PipelineError::UnknownSite => f.write_str("unable to determine site"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Result type for pipeline steps
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_key() {
        let err = PipelineError::NotFound {
            key: "/helix-config.json".into(),
        };
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "unable to load /helix-config.json: 404");
        assert!(err.is_uncacheable());
    }

    #[test]
    fn test_validation_is_cacheable() {
        let err = PipelineError::Validation("contentBusId missing".into());
        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "contentBusId missing");
        assert!(!err.is_uncacheable());
    }

    #[test]
    fn test_internal_passes_message_through() {
        let err = PipelineError::Internal("bang!".into());
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "bang!");
        assert!(err.is_uncacheable());
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = PipelineError::Upstream {
            key: "/.helix/config-all.json".into(),
            cause: "connection reset".into(),
        };
        assert_eq!(err.status(), 502);
        assert_eq!(
            err.message(),
            "unable to load /.helix/config-all.json: connection reset"
        );
    }
}
