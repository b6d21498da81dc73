//! Deadlines and sleeping.
//!
//! The runtime keeps an ordered queue of `(deadline, sequence)` keys. The
//! sequence number is a monotonic insertion counter that breaks ties
//! between equal deadlines deterministically. Firing pops due entries in
//! order and wakes their tasks; the queue then reports the delay until the
//! next pending deadline so the event loop knows how long it may park.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

pub use std::time::{Duration, Instant};
pub use timeout::{timeout, Elapsed};

pub mod timeout;

use crate::runtime::{current, current_unwrap};

pub(crate) type TimerKey = (Instant, u64);

/// The ordered set of pending deadlines.
#[derive(Clone)]
pub(crate) struct TimerQueue {
    inner: Rc<RefCell<TimerDriver>>,
}

pub(crate) struct TimerDriver {
    entries: BTreeMap<TimerKey, Waker>,
    sequence: u64,
}

impl TimerQueue {
    pub fn new() -> TimerQueue {
        TimerQueue {
            inner: Rc::new(RefCell::new(TimerDriver {
                entries: BTreeMap::new(),
                sequence: 0,
            })),
        }
    }

    pub fn insert(&self, deadline: Instant, waker: Waker) -> TimerKey {
        let mut driver = self.inner.borrow_mut();
        driver.sequence += 1;
        let key = (deadline, driver.sequence);
        driver.entries.insert(key, waker);
        key
    }

    pub fn refresh(&self, key: TimerKey, waker: &Waker) {
        if let Some(entry) = self.inner.borrow_mut().entries.get_mut(&key) {
            entry.clone_from(waker);
        }
    }

    /// Removes a registration. Idempotent, so the sleep future's destructor
    /// can always call it, fired or not.
    pub fn remove(&self, key: TimerKey) {
        self.inner.borrow_mut().entries.remove(&key);
    }

    /// Fires every due deadline in order and returns the delay until the
    /// next pending one, or `None` when the queue is empty. Entries
    /// inserted while firing are eligible in the same pass if already due.
    pub fn fire(&self) -> Option<Duration> {
        loop {
            let mut driver = self.inner.borrow_mut();
            let (&(deadline, _), _) = driver.entries.first_key_value()?;
            let now = Instant::now();
            if deadline > now {
                return Some(deadline - now);
            }
            let (_, waker) = driver.entries.pop_first()?;
            drop(driver);
            waker.wake();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// Waits until `deadline`. Completes immediately when the deadline has
/// already passed.
pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep {
        deadline,
        key: None,
    }
}

/// Waits until `duration` has elapsed. An asynchronous analog to
/// `std::thread::sleep`.
///
/// # Cancellation
/// Dropping the returned future removes its deadline from the runtime's
/// timer queue; no other cleanup is needed.
///
/// # Panics
/// The future panics if polled outside the context of a horus runtime.
///
/// ```
/// # horus::block_on(async {
/// use horus::time::{sleep, Duration};
/// use std::time::Instant;
///
/// let time = Instant::now();
/// let duration = Duration::from_millis(100);
/// sleep(duration).await;
/// assert!(time.elapsed() >= duration);
/// # }).unwrap();
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    sleep_until(Instant::now() + duration)
}

/// Future returned by [`sleep`] and [`sleep_until`].
pub struct Sleep {
    deadline: Instant,
    key: Option<TimerKey>,
}

impl Unpin for Sleep {}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let timers = current_unwrap("sleep").timers;
        if Instant::now() >= self.deadline {
            if let Some(key) = self.key.take() {
                timers.remove(key);
            }
            return Poll::Ready(());
        }
        match self.key {
            Some(key) => timers.refresh(key, cx.waker()),
            None => self.key = Some(timers.insert(self.deadline, cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else { return };
        if let Some(rt) = current() {
            rt.timers.remove(key);
        }
    }
}
