//! Asynchronous tasks.
//!
//! A task is a light weight, cooperatively scheduled unit of execution,
//! managed by the horus runtime rather than the OS scheduler. A task runs
//! until it yields at an `await` point; the runtime then switches to the
//! next ready task. Resuming a task is a queue push plus a single `poll`
//! call, so arbitrarily deep `await` chains run in constant native stack.
//!
//! # Spawning
//!
//! [`spawn`] submits a future to the runtime and returns a [`JoinHandle`],
//! itself a future that yields the task's output:
//!
//! ```no_run
//! # horus::block_on(async {
//! let join = horus::spawn(async { "hello world!" });
//! let result = join.await;
//! assert_eq!(result, "hello world!");
//! # }).unwrap();
//! ```
//!
//! Dropping a `JoinHandle` cancels the task: the future is destroyed at its
//! current suspension point and any timer or readiness registrations it
//! holds are removed. Tasks that should outlive their handle must be
//! detached, either with [`JoinHandle::detach`] or with the free function
//! [`detach`]:
//!
//! ```no_run
//! # horus::block_on(async {
//! horus::detach(async {
//!     // runs to completion even though nobody joins it
//! });
//! # }).unwrap();
//! ```
//!
//! A detached task lives in the runtime's task table until its future
//! completes; completion removes the entry.
//!
//! # Panics
//!
//! A panic inside a spawned task is captured and stored in the task. Joining
//! the task re-raises the panic in the joining context. If a failed task is
//! never joined, the payload is discarded when the task is dropped: the
//! parent is responsible for observing its children.

use std::task::Waker;

pub use fns::{detach, spawn};
pub use join_handle::JoinHandle;
pub(crate) use meta::Metadata;
pub(crate) use raw_task::RawTask;
pub(crate) use shared_task::SharedTask;
pub(crate) use task_repr::TaskRepr;
pub use yield_now::yield_now;

mod fns;
mod join_handle;
mod meta;
mod raw_task;
mod shared_task;
mod task_repr;
mod waker;
mod yield_now;

pub(crate) use waker::waker;

impl SharedTask {
    pub(crate) fn waker(self) -> Waker {
        waker(self)
    }
}
