#![allow(dead_code)]

pub mod fixtures {
    use edge_preflight::loader::{LoadOutcome, MemoryLoader};
    use edge_preflight::pipeline::PreflightRequest;
    use edge_preflight::site::SiteIdentity;
    use http::Method;

    pub const HELIX_CONFIG_JSON: &str = r#"{"content":{"/":{"contentBusId":"foobus"}}}"#;
    pub const CODE_CONFIG_KEY: &str = "owner/repo/ref/helix-config.json";
    pub const CONFIG_ALL_KEY: &str = "foobus/live/.helix/config-all.json";
    pub const METADATA_KEY: &str = "foobus/live/metadata.json";

    pub fn site() -> SiteIdentity {
        SiteIdentity::new("owner", "repo", "ref", "live")
    }

    /// Store holding only the code config
    pub fn default_loader() -> MemoryLoader {
        MemoryLoader::new().reply(
            "helix-code-bus",
            CODE_CONFIG_KEY,
            LoadOutcome::found(HELIX_CONFIG_JSON),
        )
    }

    /// Lower-case `options`, as browsers behind some proxies send it
    pub fn options_request(path: &str) -> PreflightRequest {
        let method = Method::from_bytes(b"options").unwrap();
        PreflightRequest::new(method, path)
    }

    /// A typical cross-origin preflight for a POST with a JSON body
    pub fn cors_request(path: &str) -> PreflightRequest {
        options_request(path)
            .with_header("access-control-request-method", "POST")
            .with_header("access-control-request-headers", "content-type")
            .with_header("origin", "https://foo.bar")
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Send a raw request and read until the server closes or goes quiet
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if response_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn response_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    /// Status code and lower-cased headers of a raw response
    pub fn parse_head(resp: &str) -> (u16, Vec<(String, String)>) {
        let head = resp.split("\r\n\r\n").next().unwrap_or("");
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| {
                let (name, value) = l.split_once(':')?;
                Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
            })
            .collect();
        (status, headers)
    }

    pub fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub mod test_server {
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Reserve a free local port
    pub fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }
}
