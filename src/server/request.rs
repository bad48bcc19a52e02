use http::Method;
use may_minihttp::Request;
use tracing::debug;

use crate::pipeline::PreflightRequest;

/// Strip the query string (and fragment) from a request target
pub(crate) fn request_path(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    match &raw[..end] {
        "" => "/",
        path => path,
    }
}

/// Build a [`PreflightRequest`] from raw request parts
///
/// Unknown method tokens are kept as extension methods so that the
/// pipeline can reject them with 405. A token that is not even a valid
/// HTTP token yields `None`.
pub fn build_request<'a, I>(method: &str, target: &str, headers: I) -> Option<PreflightRequest>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let method = Method::from_bytes(method.as_bytes()).ok()?;
    let mut req = PreflightRequest::new(method, request_path(target));
    for (name, value) in headers {
        req = req.with_header(name, value);
    }
    Some(req)
}

/// Convert a `may_minihttp` request
pub fn parse_request(req: &Request) -> Option<PreflightRequest> {
    let headers = req
        .headers()
        .iter()
        .map(|h| (h.name, String::from_utf8_lossy(h.value).into_owned()));
    let parsed = build_request(req.method(), req.path(), headers)?;
    debug!(
        request_id = %parsed.request_id,
        method = %parsed.method,
        path = %parsed.path,
        header_count = parsed.headers.len(),
        "HTTP request parsed"
    );
    Some(parsed)
}
