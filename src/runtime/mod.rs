//! The horus runtime.
//!
//! Asynchronous code needs two services at run time: an event source that
//! notices when suspended work can continue (file descriptors becoming
//! ready, deadlines expiring), and a scheduler that polls ready tasks.
//! [`Runtime`] bundles both, together with their configuration.
//!
//! A runtime is usually created implicitly by the [`main`](crate::main)
//! attribute macro or by [`block_on`]:
//!
//! ```
//! use horus::runtime::Runtime;
//! use horus::task::yield_now;
//!
//! # fn main() -> std::io::Result<()> {
//! let rt = Runtime::new()?;
//! rt.block_on(async {
//!     yield_now().await;
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # The event loop
//!
//! `block_on` drives a single loop on the calling thread:
//!
//! 1. poll the root future if it has been woken, then every ready task;
//! 2. fire due timers; the queue reports the delay until the next deadline;
//! 3. if any file descriptor is registered, park in `epoll_wait`, bounded
//!    by that delay; otherwise, if a deadline is pending, sleep until it;
//! 4. if the root future is still pending but nothing can wake it, bail
//!    out with an error instead of spinning forever.

use std::future::Future;
use std::io;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::thread;

use crate::reactor::Reactor;
use crate::task::JoinHandle;
use crate::time::TimerQueue;
use waker::MainWaker;

pub use config::Config;
pub use globals::current;
pub(crate) use executor::Executor;
pub(crate) use globals::{current_unwrap, RUNTIME};

mod config;
mod executor;
mod globals;
mod waker;

/// The horus local runtime. Cloning is cheap: clones share the same
/// executor, reactor and timer queue.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) config: Config,
    pub(crate) executor: Rc<Executor>,
    pub(crate) reactor: Reactor,
    pub(crate) timers: TimerQueue,
}

impl Runtime {
    /// Creates a new runtime with the default [`Config`].
    ///
    /// # Errors
    /// Errors if the epoll instance could not be created.
    pub fn new() -> io::Result<Runtime> {
        Config::default().build()
    }

    pub(crate) fn with_config(config: Config) -> io::Result<Runtime> {
        Ok(Runtime {
            reactor: Reactor::new(&config)?,
            executor: Rc::new(Executor::new()),
            timers: TimerQueue::new(),
            config,
        })
    }

    /// Runs a future to completion on this runtime, blocking the current
    /// thread until it resolves.
    ///
    /// Tasks spawned by the future are suspended when `block_on` returns;
    /// calling `block_on` again resumes them.
    ///
    /// # Errors
    /// Errors if the root future stalls: it is pending, but no timer, no
    /// readiness registration and no ready task exists that could wake it.
    ///
    /// # Panics
    /// Panics if the blocked on future panics, or when called from the
    /// inside of another runtime. Panics on spawned tasks are caught and
    /// re-raised at their join handle.
    pub fn block_on<F>(&self, future: F) -> io::Result<F::Output>
    where
        F: Future,
    {
        let msg = "called `block_on` from the inside of another horus runtime.";
        assert!(current().is_none(), "{}", msg);

        // enter the runtime context so functions like `spawn` resolve here.
        let _h = self.enter();

        let mut future = pin!(future);
        let main = MainWaker::new();
        let waker = main.waker();
        let cx = &mut Context::from_waker(&waker);

        loop {
            if main.take() {
                if let Poll::Ready(output) = future.as_mut().poll(cx) {
                    return Ok(output);
                }
            }
            self.executor.run_queue();

            // a task may have woken the root future or another task;
            // run them before going back to the kernel.
            let delay = self.timers.fire();
            if main.is_notified() || self.executor.has_ready() {
                continue;
            }

            if self.reactor.registered() > 0 {
                let timeout = delay.unwrap_or(self.config.max_park);
                self.reactor.wait(timeout)?;
            } else if let Some(delay) = delay {
                thread::sleep(delay);
            } else {
                return Err(stalled());
            }
        }
    }

    /// Spawns a new task onto the runtime, returning a [`JoinHandle`] for
    /// it.
    #[must_use = "tasks are cancelled when their JoinHandle is dropped; detach() to let them run"]
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + 'static,
    {
        let task = self
            .executor
            .spawn(future, Rc::downgrade(&self.executor));
        // Safety: the task was just created from a future outputting
        // F::Output.
        unsafe { JoinHandle::new(task) }
    }

    /// Enters the runtime context. While the guard is in scope, runtime
    /// dependent functions such as `spawn` resolve to this runtime.
    #[must_use]
    pub fn enter(&self) -> impl Drop + '_ {
        struct Enter<'a>(Option<Runtime>, &'a ());
        impl Drop for Enter<'_> {
            fn drop(&mut self) {
                RUNTIME.with(|cell| cell.replace(self.0.take()));
            }
        }
        let new_rt = Some(self.clone());
        let rt = RUNTIME.with(|cell| cell.replace(new_rt));
        Enter(rt, &())
    }
}

/// Runs a future to completion on a fresh runtime, blocking the current
/// thread. See [`Runtime::block_on`].
///
/// # Errors
/// Errors if the epoll instance could not be created, or if the root
/// future stalls.
///
/// # Panics
/// Panics if called from the inside of another horus runtime. Runtimes
/// cannot be nested.
pub fn block_on<F: Future>(future: F) -> io::Result<F::Output> {
    Runtime::new()?.block_on(future)
}

fn stalled() -> io::Error {
    io::Error::new(
        io::ErrorKind::WouldBlock,
        "the root task is stalled: it is pending, but there are no timers, \
         readiness registrations or ready tasks left to wake it",
    )
}
