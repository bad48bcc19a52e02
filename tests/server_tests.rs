//! End-to-end tests through `may_minihttp`
//!
//! Starts a [`PreflightService`] on a free port and talks raw HTTP/1.1 to it,
//! covering host-based site resolution, the default site, `/health` and
//! query string handling.

use std::net::SocketAddr;
use std::sync::Arc;

use edge_preflight::loader::{Buckets, LoadOutcome, MemoryLoader};
use edge_preflight::pipeline::OptionsPipe;
use edge_preflight::server::{HttpServer, PreflightService, ServerHandle};
use edge_preflight::site::SiteIdentity;

mod common;
use common::http::{header, parse_head, send_request};
use common::test_server::{free_addr, setup_may_runtime};

/// Test fixture with automatic teardown
struct TestServer {
    handle: Option<ServerHandle>,
}

impl TestServer {
    fn start(default_site: Option<SiteIdentity>) -> Self {
        setup_may_runtime();
        let loader = MemoryLoader::new()
            .reply(
                "helix-code-bus",
                "acme/website/main/helix-config.json",
                LoadOutcome::found(r#"{"content":{"/":{"contentBusId":"acmebus"}}}"#),
            )
            .reply(
                "helix-content-bus",
                "acmebus/live/.helix/config-all.json",
                LoadOutcome::found(
                    r#"{"headers":{"data":{"/api/**":[{"key":"access-control-allow-origin","value":"*"}]}}}"#,
                ),
            );
        let pipe = OptionsPipe::new(Arc::new(loader), Buckets::default());
        let service = PreflightService::new(pipe).with_default_site(default_site);

        let addr = free_addr();
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        assert_eq!(handle.addr(), addr);
        Self {
            handle: Some(handle),
        }
    }

    fn addr(&self) -> SocketAddr {
        self.handle.as_ref().map(ServerHandle::addr).unwrap()
    }

    fn request(&self, raw: &str) -> (u16, Vec<(String, String)>, String) {
        let resp = send_request(&self.addr(), raw);
        let (status, headers) = parse_head(&resp);
        let body = resp.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
        (status, headers, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[test]
fn test_health_endpoint() {
    let server = TestServer::start(None);
    let (status, _, body) = server.request("GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(status, 200);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[test]
fn test_site_from_host_name() {
    let server = TestServer::start(None);
    let (status, headers, _) = server.request(
        "OPTIONS /api/v1/items?limit=10 HTTP/1.1\r\n\
         Host: main--website--acme.hlx.live\r\n\
         Origin: https://foo.bar\r\n\
         Access-Control-Request-Method: POST\r\n\
         Access-Control-Request-Headers: content-type\r\n\r\n",
    );
    assert_eq!(status, 204);
    assert_eq!(header(&headers, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&headers, "access-control-allow-headers"), Some("content-type"));
    assert_eq!(header(&headers, "access-control-max-age"), Some("86400"));
}

#[test]
fn test_custom_domain_uses_default_site() {
    let server = TestServer::start(Some(SiteIdentity::new("acme", "website", "main", "live")));
    let (status, headers, _) =
        server.request("OPTIONS /index.html HTTP/1.1\r\nHost: www.acme.com\r\n\r\n");
    assert_eq!(status, 204);
    assert_eq!(header(&headers, "access-control-allow-origin"), None);
    assert_eq!(header(&headers, "access-control-max-age"), Some("86400"));
}

#[test]
fn test_unknown_site_is_400() {
    let server = TestServer::start(None);
    let (status, headers, _) = server.request("OPTIONS / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(status, 400);
    assert_eq!(header(&headers, "x-error"), Some("unable to determine site"));
}

#[test]
fn test_missing_code_config_over_http() {
    let server = TestServer::start(None);
    let (status, headers, _) =
        server.request("OPTIONS / HTTP/1.1\r\nHost: main--other--acme.hlx.page\r\n\r\n");
    assert_eq!(status, 404);
    assert_eq!(
        header(&headers, "x-error"),
        Some("unable to load /helix-config.json: 404")
    );
    assert_eq!(
        header(&headers, "cache-control"),
        Some("no-store, private, must-revalidate")
    );
}

#[test]
fn test_get_is_405() {
    let server = TestServer::start(Some(SiteIdentity::new("acme", "website", "main", "live")));
    let (status, headers, _) = server.request("GET /index.html HTTP/1.1\r\nHost: www.acme.com\r\n\r\n");
    assert_eq!(status, 405);
    assert_eq!(header(&headers, "allow"), Some("OPTIONS"));
}
