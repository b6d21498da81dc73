//! The readiness side of the event loop: an epoll instance mapping file
//! descriptors to the wakers of the tasks awaiting them.

use std::cell::{RefCell, RefMut};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::runtime::Config;

pub(crate) use epoll::Driver;

mod epoll;
pub(crate) mod op;

/// Shared handle to the epoll driver.
#[derive(Clone)]
pub(crate) struct Reactor {
    driver: Rc<RefCell<Driver>>,
}

impl Reactor {
    pub fn new(config: &Config) -> io::Result<Self> {
        let driver = Driver::new(config)?;
        Ok(Reactor {
            driver: Rc::new(RefCell::new(driver)),
        })
    }

    pub fn driver(&self) -> RefMut<'_, Driver> {
        self.driver.borrow_mut()
    }

    /// Number of currently registered file descriptors.
    pub fn registered(&self) -> usize {
        self.driver.borrow().len()
    }

    /// Blocks until at least one registered descriptor becomes ready or the
    /// timeout expires, waking the tasks whose descriptors fired.
    pub fn wait(&self, timeout: Duration) -> io::Result<()> {
        self.driver.borrow_mut().wait(timeout)?;
        Ok(())
    }
}

/// The reactor of the current runtime context.
///
/// # Panics
/// Panics when called from the outside of a runtime context.
pub(crate) fn current() -> Reactor {
    const ERR_MSG: &str =
        "attempted to perform async I/O from the outside of a horus runtime context.";
    crate::runtime::current().expect(ERR_MSG).reactor
}

#[cfg(test)]
mod tests {
    use crate::time::{sleep, Duration};
    use crate::utils::syscall;

    fn pipe() -> (i32, i32) {
        let mut fds = [0i32; 2];
        syscall!(pipe2, fds.as_mut_ptr(), libc::O_NONBLOCK | libc::O_CLOEXEC).unwrap();
        (fds[0], fds[1])
    }

    // every register is paired with a deregister: after the read resolves,
    // the kernel side is empty again.
    #[test]
    fn registrations_balance_out() {
        let rt = crate::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let rt = crate::runtime::current().unwrap();
            let (read_fd, write_fd) = pipe();

            let reader = crate::spawn(async move {
                let mut buf = [0u8; 8];
                super::op::read_best_effort(read_fd, &mut buf).await.unwrap()
            });
            sleep(Duration::from_millis(10)).await;
            assert_eq!(rt.reactor.registered(), 1);

            syscall!(write, write_fd, b"ping".as_ptr().cast(), 4).unwrap();
            let status = reader.await;
            assert_eq!(status.len, 4);
            assert_eq!(rt.reactor.registered(), 0);

            syscall!(close, read_fd).unwrap();
            syscall!(close, write_fd).unwrap();
        })
        .unwrap();
    }

    // cancelling a task mid-suspension removes its registration.
    #[test]
    fn dropping_a_suspended_reader_deregisters() {
        let rt = crate::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let rt = crate::runtime::current().unwrap();
            let (read_fd, write_fd) = pipe();

            let reader = crate::spawn(async move {
                let mut buf = [0u8; 8];
                let _ = super::op::read_best_effort(read_fd, &mut buf).await;
            });
            sleep(Duration::from_millis(10)).await;
            assert_eq!(rt.reactor.registered(), 1);

            drop(reader);
            assert_eq!(rt.reactor.registered(), 0);

            syscall!(close, read_fd).unwrap();
            syscall!(close, write_fd).unwrap();
        })
        .unwrap();
    }

    // one awaiter per descriptor: a second task waiting on the same fd is
    // rejected instead of corrupting the first registration.
    #[test]
    fn a_second_awaiter_on_the_same_fd_errors() {
        let rt = crate::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (read_fd, write_fd) = pipe();

            let first = crate::spawn(async move {
                let mut buf = [0u8; 8];
                let _ = super::op::read_best_effort(read_fd, &mut buf).await;
            });
            sleep(Duration::from_millis(10)).await;

            let second = crate::spawn(async move {
                let mut buf = [0u8; 8];
                super::op::read_best_effort(read_fd, &mut buf).await
            });
            sleep(Duration::from_millis(10)).await;
            let err = second.await.unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

            drop(first);
            syscall!(close, read_fd).unwrap();
            syscall!(close, write_fd).unwrap();
        })
        .unwrap();
    }
}
