use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Request headers parsed per request
///
/// Preflights sit behind CDNs and proxies that add their own forwarding
/// headers, so this is well above what a browser sends.
pub const MAX_REQUEST_HEADERS: usize = 32;

/// Wrapper around may_minihttp's HTTP server
pub struct HttpServer<T>(pub T);

/// Handle to a running HTTP server
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to accept connections
    ///
    /// # Errors
    ///
    /// `TimedOut` if no connection succeeds within ~250ms (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the server coroutine and wait for it to finish
    pub fn stop(self) {
        info!(addr = %self.addr, "Stopping server");
        // SAFETY: cancel() is unsafe in the may runtime. The handle is owned
        // here and the coroutine is joined right after, so nothing observes
        // it half-cancelled.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server coroutine finishes
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Bind `addr` and start serving
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = HttpServerWithHeaders::<_, MAX_REQUEST_HEADERS>(self.0).start(addr)?;
        info!(addr = %addr, "Preflight server listening");
        Ok(ServerHandle { addr, handle })
    }
}
