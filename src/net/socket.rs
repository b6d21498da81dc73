#![allow(clippy::upper_case_acronyms)]

use std::io::Result;
use std::mem::{size_of, zeroed};
use std::net::{Shutdown, SocketAddr};

use crate::fd::AsyncFile;
use crate::reactor::op;
use crate::utils::syscall;

use super::utils::{socket_addr, to_std_socket_addr};

#[repr(i32)]
pub enum Domain {
    V4 = libc::AF_INET,
    V6 = libc::AF_INET6,
}

impl From<SocketAddr> for Domain {
    fn from(addr: SocketAddr) -> Domain {
        match addr {
            SocketAddr::V4(_) => Domain::V4,
            SocketAddr::V6(_) => Domain::V6,
        }
    }
}

#[repr(i32)]
pub enum Type {
    STREAM = libc::SOCK_STREAM,
    DGRAM = libc::SOCK_DGRAM,
}

#[repr(i32)]
#[derive(Default)]
pub enum Protocol {
    #[default]
    UNSPECIFIED = 0,
    TCP = libc::IPPROTO_TCP,
    UDP = libc::IPPROTO_UDP,
}

/// A non blocking socket owned through an [`AsyncFile`].
#[derive(Debug)]
pub struct Socket {
    pub(crate) file: AsyncFile,
}

impl Socket {
    /// Creates a new socket.
    pub fn new(domain: Domain, ty: Type, proto: Protocol) -> Result<Socket> {
        let fd = syscall!(
            socket,
            domain as i32,
            ty as i32 | libc::SOCK_CLOEXEC,
            proto as i32
        )?;
        Ok(Socket {
            file: AsyncFile::new(fd)?,
        })
    }

    pub fn bind(&self, addr: &SocketAddr) -> Result<()> {
        let (raw, len) = socket_addr(addr);
        syscall!(bind, self.file.fd(), raw.as_ptr(), len)?;
        Ok(())
    }

    pub fn listen(&self, backlog: i32) -> Result<()> {
        syscall!(listen, self.file.fd(), backlog)?;
        Ok(())
    }

    /// Waits for an incoming connection and accepts it. The accepted socket
    /// is set non blocking.
    pub async fn accept(&self) -> Result<(Socket, SocketAddr)> {
        let (fd, addr) = op::accept(self.file.fd()).await?;
        let socket = Socket {
            file: AsyncFile::from_owned(fd)?,
        };
        Ok((socket, addr))
    }

    pub async fn connect(&self, addr: SocketAddr) -> Result<()> {
        op::connect(self.file.fd(), addr).await
    }

    pub async fn shutdown(&self, how: Shutdown) -> Result<()> {
        op::shutdown(self.file.fd(), how).await
    }

    /// The address this socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        // Safety: sockaddr_storage is valid for any all-zeroes bit pattern.
        let mut storage: libc::sockaddr_storage = unsafe { zeroed() };
        let mut len = size_of::<libc::sockaddr_storage>() as libc::socklen_t;
        syscall!(
            getsockname,
            self.file.fd(),
            &mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr,
            &mut len,
        )?;
        to_std_socket_addr(&storage)
    }

    /// The address of this socket's peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        // Safety: sockaddr_storage is valid for any all-zeroes bit pattern.
        let mut storage: libc::sockaddr_storage = unsafe { zeroed() };
        let mut len = size_of::<libc::sockaddr_storage>() as libc::socklen_t;
        syscall!(
            getpeername,
            self.file.fd(),
            &mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr,
            &mut len,
        )?;
        to_std_socket_addr(&storage)
    }

    pub fn fd(&self) -> i32 {
        self.file.fd()
    }
}
