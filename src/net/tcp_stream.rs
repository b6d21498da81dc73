use std::io::Result;
use std::net::{Shutdown, SocketAddr};

use crate::io::{hung_up, AsyncRead, AsyncWrite, IoStatus};
use crate::reactor::op;

use super::socket::{Domain, Protocol, Socket, Type};

/// A TCP stream between a local and a remote socket.
///
/// Streams are produced by [`connect`](TcpStream::connect)ing to a remote
/// host or by [accepting](super::TcpListener::accept) a connection on a
/// listener. Reads and writes are best-effort: one readiness wait, one
/// syscall; short transfers are reported, not hidden. The descriptor is
/// closed when the stream is dropped.
#[derive(Debug)]
pub struct TcpStream {
    pub(crate) socket: Socket,
}

impl TcpStream {
    /// Opens a TCP connection to `addr`.
    ///
    /// A connect the kernel reports as in progress is awaited through
    /// writability; the pending socket error is then checked, so refused
    /// connections surface here.
    pub async fn connect(addr: SocketAddr) -> Result<TcpStream> {
        let socket = Socket::new(Domain::from(addr), Type::STREAM, Protocol::TCP)?;
        socket.connect(addr).await?;
        Ok(TcpStream { socket })
    }

    /// Resolves `host` (an IP literal or a hostname) and connects to it.
    pub async fn connect_to(host: &str, port: u16) -> Result<TcpStream> {
        let addr = super::resolve(host, port)?;
        TcpStream::connect(addr).await
    }

    /// Reads some bytes into `buf`. See [`IoStatus`] for the hangup
    /// semantics.
    pub async fn read(&self, buf: &mut [u8]) -> Result<IoStatus> {
        op::read_best_effort(self.socket.fd(), buf).await
    }

    /// Writes some bytes from `buf`.
    pub async fn write(&self, buf: &[u8]) -> Result<IoStatus> {
        op::write_best_effort(self.socket.fd(), buf).await
    }

    /// Writes the entire buffer, looping over partial writes.
    ///
    /// # Errors
    /// A hangup before the last byte is reported as `UnexpectedEof`.
    pub async fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            let IoStatus { len, hup } = self.write(&buf[written..]).await?;
            if len == 0 && hup {
                return Err(hung_up());
            }
            written += len;
        }
        Ok(())
    }

    /// Shuts down the read, write, or both halves of the connection.
    pub async fn shutdown(&self, how: Shutdown) -> Result<()> {
        self.socket.shutdown(how).await
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

impl AsyncRead for TcpStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<IoStatus> {
        TcpStream::read(self, buf).await
    }
}

impl AsyncRead for &TcpStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<IoStatus> {
        TcpStream::read(*self, buf).await
    }
}

impl AsyncWrite for TcpStream {
    async fn write(&mut self, buf: &[u8]) -> Result<IoStatus> {
        TcpStream::write(self, buf).await
    }
}

impl AsyncWrite for &TcpStream {
    async fn write(&mut self, buf: &[u8]) -> Result<IoStatus> {
        TcpStream::write(*self, buf).await
    }
}
