use std::cell::Cell;
use std::collections::HashMap;
use std::io::{Error, ErrorKind, Result};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::rc::Rc;
use std::task::Waker;
use std::time::Duration;

use crate::runtime::Config;
use crate::utils::syscall;

/// A single registration: the waker of the awaiting task plus the slot the
/// fired event mask is delivered through. The slot lives inside the
/// suspended awaiter, so its lifetime is dominated by the suspension span.
struct Entry {
    waker: Waker,
    fired: Rc<Cell<u32>>,
}

/// The epoll driver. Registrations are keyed by file descriptor, and each
/// descriptor admits exactly one awaiting task at a time.
pub(crate) struct Driver {
    epoll: OwnedFd,
    entries: HashMap<RawFd, Entry>,
    events: Vec<libc::epoll_event>,
}

impl Driver {
    pub fn new(config: &Config) -> Result<Driver> {
        let fd = syscall!(epoll_create1, libc::EPOLL_CLOEXEC)?;
        // Safety: epoll_create1 returned a fresh descriptor we now own.
        let epoll = unsafe { OwnedFd::from_raw_fd(fd) };
        let events = (0..config.wait_events)
            .map(|_| libc::epoll_event { events: 0, u64: 0 })
            .collect();
        Ok(Driver {
            epoll,
            entries: HashMap::new(),
            events,
        })
    }

    /// Registers interest in `events` on `fd`. The fired event mask is
    /// written through `fired` right before the waker runs.
    ///
    /// # Errors
    /// Errors if another task is already waiting on `fd`, or if the kernel
    /// rejects the registration.
    pub fn register(
        &mut self,
        fd: RawFd,
        events: u32,
        waker: Waker,
        fired: Rc<Cell<u32>>,
    ) -> Result<()> {
        if self.entries.contains_key(&fd) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "a file descriptor can only be awaited by one task at a time",
            ));
        }
        let mut event = libc::epoll_event {
            events,
            u64: fd as u64,
        };
        syscall!(
            epoll_ctl,
            self.epoll.as_raw_fd(),
            libc::EPOLL_CTL_ADD,
            fd,
            &mut event,
        )?;
        self.entries.insert(fd, Entry { waker, fired });
        Ok(())
    }

    /// Updates the waker of an existing registration.
    pub fn refresh(&mut self, fd: RawFd, waker: &Waker) {
        if let Some(entry) = self.entries.get_mut(&fd) {
            entry.waker.clone_from(waker);
        }
    }

    /// Removes the registration for `fd`. Idempotent: removing a descriptor
    /// that is not registered is a no-op, so awaiter destructors can always
    /// call it.
    pub fn deregister(&mut self, fd: RawFd) {
        if self.entries.remove(&fd).is_some() {
            let _ = syscall!(
                epoll_ctl,
                self.epoll.as_raw_fd(),
                libc::EPOLL_CTL_DEL,
                fd,
                std::ptr::null_mut::<libc::epoll_event>(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// One `epoll_wait` call. Every reported event is written into its
    /// awaiter's slot and the task is woken; the awaiter deregisters when
    /// it resumes.
    pub fn wait(&mut self, timeout: Duration) -> Result<usize> {
        let millis = timeout.as_millis();
        // round sub-millisecond waits up so we never spin on a zero
        // timeout the kernel would return from immediately.
        let millis = if millis == 0 && !timeout.is_zero() {
            1
        } else {
            millis.min(i32::MAX as u128) as i32
        };
        let res = syscall!(
            epoll_wait,
            self.epoll.as_raw_fd(),
            self.events.as_mut_ptr(),
            self.events.len() as i32,
            millis,
        );
        let count = match res {
            Ok(count) => count as usize,
            Err(err) if err.raw_os_error() == Some(libc::EINTR) => 0,
            Err(err) => return Err(err),
        };
        for event in &self.events[..count] {
            let fd = event.u64 as RawFd;
            if let Some(entry) = self.entries.get(&fd) {
                entry.fired.set(event.events);
                entry.waker.wake_by_ref();
            }
        }
        Ok(count)
    }
}
