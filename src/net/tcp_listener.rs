use std::io::Result;
use std::net::SocketAddr;

use super::socket::{Domain, Protocol, Socket, Type};
use super::TcpStream;

/// A TCP socket listening for connections.
pub struct TcpListener {
    socket: Socket,
}

impl TcpListener {
    /// Binds to `addr` and starts listening. Binding to port 0 lets the
    /// kernel pick a free port; read it back with
    /// [`local_addr`](TcpListener::local_addr).
    pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
        let socket = Socket::new(Domain::from(addr), Type::STREAM, Protocol::TCP)?;
        socket.bind(&addr)?;
        socket.listen(libc::SOMAXCONN)?;
        Ok(TcpListener { socket })
    }

    /// Waits for and accepts an incoming connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (socket, addr) = self.socket.accept().await?;
        Ok((TcpStream { socket }, addr))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }
}
