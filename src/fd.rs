//! Ownership of raw file descriptors.

use std::io::{Error, ErrorKind, Result};
use std::mem::replace;
use std::os::fd::{IntoRawFd, OwnedFd, RawFd};

use crate::utils::syscall;

/// A file descriptor prepared for use with the runtime.
///
/// Construction puts the descriptor into non blocking mode unless the
/// caller opts out. An owned wrapper closes the descriptor exactly once on
/// drop; a borrowed one leaves closing to whoever handed the descriptor
/// out. `AsyncFile` is move-only.
#[derive(Debug)]
pub struct AsyncFile {
    fd: RawFd,
    owned: bool,
}

impl AsyncFile {
    /// Takes ownership of `fd` and sets its non blocking flag.
    pub fn new(fd: RawFd) -> Result<AsyncFile> {
        AsyncFile::from_raw(fd, true, false)
    }

    /// Borrows `fd`: the descriptor is set non blocking but not closed on
    /// drop.
    pub fn borrowed(fd: RawFd) -> Result<AsyncFile> {
        AsyncFile::from_raw(fd, true, true)
    }

    /// Full control constructor: `nonblock` toggles the `O_NONBLOCK` setup,
    /// `borrow` decides whether drop closes the descriptor.
    pub fn from_raw(fd: RawFd, nonblock: bool, borrow: bool) -> Result<AsyncFile> {
        if nonblock {
            set_nonblock(fd)?;
        }
        Ok(AsyncFile { fd, owned: !borrow })
    }

    pub(crate) fn from_owned(fd: OwnedFd) -> Result<AsyncFile> {
        AsyncFile::new(fd.into_raw_fd())
    }

    /// Gives up ownership, returning the raw descriptor and leaving the
    /// wrapper empty. The caller becomes responsible for closing.
    pub fn release(&mut self) -> RawFd {
        self.owned = false;
        replace(&mut self.fd, -1)
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// Duplicates one of the standard stream descriptors.
    ///
    /// # Errors
    /// Errors when `fd` is not stdin, stdout or stderr.
    pub fn dup_std(fd: RawFd) -> Result<AsyncFile> {
        if !matches!(fd, libc::STDIN_FILENO | libc::STDOUT_FILENO | libc::STDERR_FILENO) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "fd must be one of stdin, stdout or stderr",
            ));
        }
        let dup = syscall!(dup, fd)?;
        AsyncFile::new(dup)
    }

    /// Duplicates stdin. When stdin is a terminal, `canonical = false`
    /// disables line buffering (cbreak) and `echo = false` disables input
    /// echoing.
    pub fn dup_stdin(canonical: bool, echo: bool) -> Result<AsyncFile> {
        let file = AsyncFile::dup_std(libc::STDIN_FILENO)?;
        // Safety: isatty inspects an open descriptor, nothing else.
        let is_tty = unsafe { libc::isatty(file.fd) } == 1;
        if (!canonical || !echo) && is_tty {
            // Safety: termios is a plain struct the kernel fills in.
            let mut tc: libc::termios = unsafe { std::mem::zeroed() };
            syscall!(tcgetattr, file.fd, &mut tc)?;
            if !canonical {
                tc.c_lflag &= !libc::ICANON;
            }
            if !echo {
                tc.c_lflag &= !libc::ECHO;
            }
            syscall!(tcsetattr, file.fd, libc::TCSANOW, &tc)?;
        }
        Ok(file)
    }

    pub fn dup_stdout() -> Result<AsyncFile> {
        AsyncFile::dup_std(libc::STDOUT_FILENO)
    }

    pub fn dup_stderr() -> Result<AsyncFile> {
        AsyncFile::dup_std(libc::STDERR_FILENO)
    }
}

impl Drop for AsyncFile {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            let _ = syscall!(close, self.fd);
        }
    }
}

fn set_nonblock(fd: RawFd) -> Result<()> {
    let flags = syscall!(fcntl, fd, libc::F_GETFL, 0)?;
    syscall!(fcntl, fd, libc::F_SETFL, flags | libc::O_NONBLOCK)?;
    Ok(())
}
