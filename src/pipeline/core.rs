//! Request/response value types for the preflight pipeline.

use std::sync::Arc;

use http::Method;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use ulid::Ulid;

use crate::error::{PipelineError, NO_STORE};

/// Maximum inline headers before heap allocation
///
/// Preflight requests and responses rarely carry more than a dozen headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage
///
/// Header names use `Arc<str>` so that names taken from configuration can be
/// shared without copying; values are per-request strings.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Insert or replace a header, keeping the position of an existing entry
///
/// Names are compared case-insensitively and stored lower-cased, so the
/// vector never holds two entries for the same logical header.
pub fn upsert_header(headers: &mut HeaderVec, name: &str, value: String) {
    if let Some(slot) = headers
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
    {
        slot.1 = value;
        return;
    }
    headers.push((Arc::from(name.to_ascii_lowercase()), value));
}

/// Inbound request as seen by the pipeline
///
/// Built once per request by the service adapter (or a test) and never
/// mutated while the pipeline runs.
#[derive(Debug, Clone)]
pub struct PreflightRequest {
    /// Correlation id for logs
    pub request_id: Ulid,
    pub method: Method,
    /// URL path without query string
    pub path: String,
    pub headers: HeaderVec,
}

impl PreflightRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: Ulid::new(),
            method,
            path: path.into(),
            headers: HeaderVec::new(),
        }
    }

    /// Shorthand for an `OPTIONS` request
    pub fn options(path: impl Into<String>) -> Self {
        Self::new(Method::OPTIONS, path)
    }

    /// Add a request header (builder style)
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        upsert_header(&mut self.headers, name, value.into());
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether this is a CORS preflight (`OPTIONS`, any letter case)
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        self.method.as_str().eq_ignore_ascii_case("OPTIONS")
    }
}

/// Outbound response: a status and headers, never a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightResponse {
    pub status: u16,
    pub headers: HeaderVec,
}

impl PreflightResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
        }
    }

    /// `204 No Content` with no headers yet
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// Error response carrying `x-error` and, when required, `cache-control`
    #[must_use]
    pub fn from_error(err: &PipelineError) -> Self {
        let mut res = Self::new(err.status());
        res.set_header("x-error", err.message());
        if err.is_uncacheable() {
            res.set_header("cache-control", NO_STORE.to_string());
        }
        if matches!(err, PipelineError::MethodNotAllowed) {
            res.set_header("allow", "OPTIONS".to_string());
        }
        res
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        upsert_header(&mut self.headers, name, value);
    }

    /// Render as `{"status": ..., "headers": {...}}`, headers in response order
    #[must_use]
    pub fn to_json(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        serde_json::json!({ "status": self.status, "headers": headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_keeps_position_and_lowercases() {
        let mut headers = HeaderVec::new();
        upsert_header(&mut headers, "Access-Control-Allow-Origin", "*".into());
        upsert_header(&mut headers, "x-frame-options", "DENY".into());
        upsert_header(&mut headers, "ACCESS-CONTROL-ALLOW-ORIGIN", "https://a.b".into());

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0.as_ref(), "access-control-allow-origin");
        assert_eq!(headers[0].1, "https://a.b");
        assert_eq!(headers[1].0.as_ref(), "x-frame-options");
    }

    #[test]
    fn test_lowercase_method_is_preflight() {
        let method = Method::from_bytes(b"options").unwrap();
        let req = PreflightRequest::new(method, "/");
        assert!(req.is_preflight());
        assert!(!PreflightRequest::new(Method::GET, "/").is_preflight());
    }

    #[test]
    fn test_request_header_lookup_is_case_insensitive() {
        let req = PreflightRequest::options("/").with_header("Origin", "https://foo.bar");
        assert_eq!(req.get_header("origin"), Some("https://foo.bar"));
        assert_eq!(req.get_header("x-forwarded-host"), None);
    }

    #[test]
    fn test_error_response_headers() {
        let res = PreflightResponse::from_error(&PipelineError::Validation(
            "contentBusId missing".into(),
        ));
        assert_eq!(res.status, 400);
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.get_header("x-error"), Some("contentBusId missing"));

        let res = PreflightResponse::from_error(&PipelineError::MethodNotAllowed);
        assert_eq!(res.status, 405);
        assert_eq!(res.get_header("allow"), Some("OPTIONS"));
        assert_eq!(res.get_header("cache-control"), None);
    }

    #[test]
    fn test_to_json() {
        let mut res = PreflightResponse::no_content();
        res.set_header("access-control-max-age", "86400".into());
        assert_eq!(
            res.to_json(),
            serde_json::json!({
                "status": 204,
                "headers": { "access-control-max-age": "86400" }
            })
        );
    }
}
