//! Futures over raw file descriptors: wait for readiness, then retry the
//! non blocking syscall. Partial reads and writes are surfaced to the
//! caller rather than hidden behind internal loops.

use std::cell::Cell;
use std::future::Future;
use std::io::{Error, Result};
use std::mem::{size_of_val, zeroed};
use std::net::{Shutdown, SocketAddr};
use std::os::fd::{FromRawFd, OwnedFd, RawFd};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::io::IoStatus;
use crate::net::utils::{socket_addr, to_std_socket_addr};
use crate::reactor;
use crate::utils::syscall;

/// Interest mask for reads: readable, peer shutdown, hangup.
pub(crate) const READ_EVENTS: u32 =
    (libc::EPOLLIN | libc::EPOLLRDHUP | libc::EPOLLHUP) as u32;

/// Interest mask for writes: writable, hangup.
pub(crate) const WRITE_EVENTS: u32 = (libc::EPOLLOUT | libc::EPOLLHUP) as u32;

const READ_HUP: u32 = (libc::EPOLLRDHUP | libc::EPOLLHUP) as u32;
const WRITE_HUP: u32 = (libc::EPOLLHUP | libc::EPOLLERR) as u32;

/// Suspends until one of `interest`'s events fires on `fd`, resolving to
/// the observed event mask. The registration lives exactly as long as the
/// suspension: it is installed on first poll and removed on resumption or
/// drop, whichever comes first.
pub(crate) fn wait_event(fd: RawFd, interest: u32) -> WaitEvent {
    WaitEvent {
        fd,
        interest,
        fired: Rc::new(Cell::new(0)),
        registered: false,
    }
}

pub(crate) struct WaitEvent {
    fd: RawFd,
    interest: u32,
    fired: Rc<Cell<u32>>,
    registered: bool,
}

impl Future for WaitEvent {
    type Output = Result<u32>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mask = self.fired.get();
        if mask != 0 {
            self.fired.set(0);
            self.registered = false;
            reactor::current().driver().deregister(self.fd);
            return Poll::Ready(Ok(mask));
        }
        let reactor = reactor::current();
        let mut driver = reactor.driver();
        if self.registered {
            driver.refresh(self.fd, cx.waker());
        } else {
            driver.register(self.fd, self.interest, cx.waker().clone(), self.fired.clone())?;
            drop(driver);
            self.registered = true;
        }
        Poll::Pending
    }
}

impl Drop for WaitEvent {
    fn drop(&mut self) {
        if !self.registered {
            return;
        }
        // a task dropped mid-suspension still balances its registration.
        if let Some(rt) = crate::runtime::current() {
            rt.reactor.driver().deregister(self.fd);
        }
    }
}

/// Waits for readability, then reads once. `EAGAIN` after a wakeup counts
/// as zero bytes; the caller decides whether to retry.
pub(crate) async fn read_best_effort(fd: RawFd, buf: &mut [u8]) -> Result<IoStatus> {
    let events = wait_event(fd, READ_EVENTS).await?;
    let hup = events & READ_HUP != 0;
    let len = match syscall!(read, fd, buf.as_mut_ptr().cast(), buf.len()) {
        Ok(len) => len as usize,
        Err(err) if err.raw_os_error() == Some(libc::EAGAIN) => 0,
        Err(err) => return Err(err),
    };
    Ok(IoStatus { len, hup })
}

/// Waits for writability, then writes once.
pub(crate) async fn write_best_effort(fd: RawFd, buf: &[u8]) -> Result<IoStatus> {
    let events = wait_event(fd, WRITE_EVENTS).await?;
    let hup = events & WRITE_HUP != 0;
    if hup && events & libc::EPOLLOUT as u32 == 0 {
        return Ok(IoStatus { len: 0, hup });
    }
    let len = match syscall!(write, fd, buf.as_ptr().cast(), buf.len()) {
        Ok(len) => len as usize,
        Err(err) if err.raw_os_error() == Some(libc::EAGAIN) => 0,
        Err(err) if err.raw_os_error() == Some(libc::EPIPE) => {
            return Ok(IoStatus { len: 0, hup: true })
        }
        Err(err) => return Err(err),
    };
    Ok(IoStatus { len, hup })
}

/// Accepts one connection, waiting for the listener to become readable and
/// going back to the wait on spurious wakeups.
pub(crate) async fn accept(fd: RawFd) -> Result<(OwnedFd, SocketAddr)> {
    loop {
        wait_event(fd, READ_EVENTS).await?;
        // Safety: sockaddr_storage is valid for any all-zeroes bit pattern.
        let mut storage: libc::sockaddr_storage = unsafe { zeroed() };
        let mut len = size_of_val(&storage) as libc::socklen_t;
        let res = syscall!(
            accept,
            fd,
            &mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr,
            &mut len,
        );
        match res {
            Ok(conn) => {
                // Safety: accept returned a fresh descriptor we now own.
                let conn = unsafe { OwnedFd::from_raw_fd(conn) };
                let addr = to_std_socket_addr(&storage)?;
                return Ok((conn, addr));
            }
            Err(err) if err.raw_os_error() == Some(libc::EAGAIN) => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Starts a connect and waits for it to resolve. An in-progress connect
/// completes when the socket becomes writable; the pending socket error is
/// then fetched and reported.
pub(crate) async fn connect(fd: RawFd, addr: SocketAddr) -> Result<()> {
    let (raw, len) = socket_addr(&addr);
    let res = syscall!(connect, fd, raw.as_ptr(), len);
    match res {
        Ok(_) => return Ok(()),
        Err(err)
            if matches!(
                err.raw_os_error(),
                Some(libc::EINPROGRESS) | Some(libc::EAGAIN)
            ) => {}
        Err(err) => return Err(err),
    }
    wait_event(fd, WRITE_EVENTS).await?;
    retrieve_connection_error(fd)
}

fn retrieve_connection_error(fd: RawFd) -> Result<()> {
    let mut optval: libc::c_int = 0;
    let mut optlen = size_of_val(&optval) as libc::socklen_t;
    syscall!(
        getsockopt,
        fd,
        libc::SOL_SOCKET,
        libc::SO_ERROR,
        &mut optval as *mut libc::c_int as *mut libc::c_void,
        &mut optlen,
    )?;
    if optval != 0 {
        return Err(Error::from_raw_os_error(optval));
    }
    Ok(())
}

pub(crate) async fn shutdown(fd: RawFd, how: Shutdown) -> Result<()> {
    let how = match how {
        Shutdown::Read => libc::SHUT_RD,
        Shutdown::Write => libc::SHUT_WR,
        Shutdown::Both => libc::SHUT_RDWR,
    };
    syscall!(shutdown, fd, how).map(|_| ())
}
