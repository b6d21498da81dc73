use std::any::Any;
use std::cell::Cell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use super::meta::Metadata;
use super::raw_task::RawTask;

pub(crate) struct Shared {
    meta: Metadata,
    /// whether the task is already sitting in the ready queue. Readiness
    /// events and timers may fire while the task is queued; the flag keeps
    /// the queue free of duplicates.
    queued: Cell<bool>,
    raw: Pin<Box<dyn RawTask>>,
}

/// A reference counted handle to a spawned task. Clones share the same
/// future, payload and join waker.
pub(crate) struct SharedTask(Rc<Shared>);

impl Clone for SharedTask {
    fn clone(&self) -> Self {
        SharedTask(self.0.clone())
    }
}

impl SharedTask {
    pub fn new(meta: Metadata, raw: Pin<Box<dyn RawTask>>) -> SharedTask {
        SharedTask(Rc::new(Shared {
            meta,
            queued: Cell::new(false),
            raw,
        }))
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.0.meta.id
    }

    pub fn poll(&self, cx: &mut Context) -> Poll<()> {
        self.0.raw.as_ref().poll(cx)
    }

    /// Schedules the task to be aborted: the payload is dropped now, and
    /// the next executor pass retires the entry.
    pub fn abort(&self) {
        self.0.raw.as_ref().abort();
        self.schedule();
    }

    /// Stores the panic payload of a task that panicked while being polled.
    pub fn panic(&self, payload: Box<dyn Any + Send>) {
        self.0.raw.as_ref().panic(payload);
    }

    /// # Safety
    /// `out` must point to a valid `Poll<T>` where `T` is the output type
    /// of the future this task was spawned from.
    pub unsafe fn poll_join(&self, cx: &mut Context, out: *mut ()) {
        // Safety: forwarded to the caller.
        unsafe { self.0.raw.as_ref().poll_join(cx, out) }
    }

    /// # Safety
    /// `out` must point to a valid `Option<T>` where `T` is the output type
    /// of the future this task was spawned from.
    pub unsafe fn try_result(&self, out: *mut ()) {
        // Safety: forwarded to the caller.
        unsafe { self.0.raw.as_ref().try_result(out) }
    }

    pub fn is_done(&self) -> bool {
        self.0.raw.is_done()
    }

    /// Marks the task queued. Returns the previous value.
    pub fn set_queued(&self, queued: bool) -> bool {
        self.0.queued.replace(queued)
    }

    /// Pushes the task onto its executor's ready queue, deduplicating.
    pub fn schedule(&self) {
        let Some(executor) = self.0.meta.executor.upgrade() else {
            return;
        };
        executor.push(self.clone());
    }

    pub fn into_ptr(self) -> *const () {
        Rc::into_raw(self.0) as *const ()
    }

    /// # Safety
    /// `ptr` must come from [`SharedTask::into_ptr`] and must not be used
    /// to reconstruct more tasks than `into_ptr` calls.
    pub unsafe fn from_ptr(ptr: *const ()) -> SharedTask {
        // Safety: upheld by the caller.
        SharedTask(unsafe { Rc::from_raw(ptr as *const Shared) })
    }
}
