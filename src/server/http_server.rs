use super::service::DocsService;
use crate::apispec::DocumentService;
use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// may_minihttp server accepting up to 32 request headers.
pub struct HttpServer<T>(pub T);

/// A running server.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listening address until it accepts connections (about 250ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the server coroutine and wait for it to exit.
    pub fn stop(self) {
        // SAFETY: the handle is owned here and the coroutine is not resumed after cancel.
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            tracing::warn!(addr = %self.addr, "server coroutine panicked during shutdown");
        }
    }

    /// Block until the server exits.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = HttpServerWithHeaders::<_, 32>(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}

/// Serve `docs` on `addr`.
pub fn start_docs_server<A: ToSocketAddrs>(docs: Arc<DocumentService>, addr: A) -> io::Result<ServerHandle> {
    let handle = HttpServer(DocsService::new(docs)).start(addr)?;
    info!(addr = %handle.addr(), "documentation server listening");
    Ok(handle)
}
