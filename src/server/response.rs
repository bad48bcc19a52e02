use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use may_minihttp::Response;
use serde_json::Value;
use tracing::warn;

use crate::pipeline::PreflightResponse;

/// Distinct header lines interned before a warning is logged
///
/// `may_minihttp` only accepts `&'static str` header lines. Each distinct line
/// is leaked once and reused afterwards. Lines keep being interned past this
/// size so no response ever loses a header.
pub const INTERNED_HEADER_LINES_WARN: usize = 8192;

static HEADER_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
static WARNED_LARGE: AtomicBool = AtomicBool::new(false);

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Get a `'static` copy of `line`, leaking it on first use
fn intern_header_line(line: String) -> &'static str {
    let lines = HEADER_LINES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut lines = lines.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = lines.get(line.as_str()) {
        return *existing;
    }
    if lines.len() >= INTERNED_HEADER_LINES_WARN && !WARNED_LARGE.swap(true, Ordering::Relaxed) {
        warn!(
            interned = lines.len(),
            "Interned header line set is large; echoed request headers vary widely"
        );
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(leaked);
    leaked
}

/// Render one header as a `Name: value` line
///
/// Returns `None` for values that would break the response framing.
pub(crate) fn header_line(name: &str, value: &str) -> Option<String> {
    if value.contains(['\r', '\n']) || name.contains(['\r', '\n', ':']) {
        return None;
    }
    Some(format!("{}: {}", name, value))
}

/// Write a pipeline response: status line and headers, no body
pub fn write_preflight_response(res: &mut Response, preflight: &PreflightResponse) {
    res.status_code(preflight.status as usize, status_reason(preflight.status));
    for (name, value) in &preflight.headers {
        let Some(line) = header_line(name, value) else {
            warn!(header = %name, "Dropping header with invalid characters");
            continue;
        };
        res.header(intern_header_line(line));
    }
}

/// Write a JSON body with the given status
pub fn write_json(res: &mut Response, status: u16, body: &Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
