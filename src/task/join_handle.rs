use super::SharedTask;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A handle to a spawned task. By default the task is cancelled when the
/// handle gets dropped; call [`detach`](JoinHandle::detach) to let it run
/// to completion on its own.
///
/// `JoinHandle` is itself a future yielding the task's output.
///
/// # Panics
/// Awaiting a task panics if the awaited task panicked.
pub struct JoinHandle<T> {
    task: SharedTask,
    detached: bool,
    _t: PhantomData<T>,
}

impl<T> Unpin for JoinHandle<T> {}

impl<T> JoinHandle<T> {
    /// # Safety
    /// `T` must be the output type of the future the task was spawned from.
    pub(crate) unsafe fn new(task: SharedTask) -> JoinHandle<T> {
        JoinHandle {
            task,
            detached: false,
            _t: PhantomData,
        }
    }

    /// Detaches the task from the join handle, so it will not get cancelled
    /// when the handle is dropped.
    #[inline]
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Schedules the task to be aborted on the next event loop pass. The
    /// task's future is dropped at its current suspension point, which
    /// removes any timer or readiness registrations it holds.
    pub fn abort(self) {
        self.task.abort();
    }

    /// Whether the task has finished running (completed, panicked, or been
    /// aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_done()
    }

    /// Returns the task's output if it has completed, without blocking.
    ///
    /// Returns `None` while the task is still running. The output is moved
    /// out, so a second call after `Some` panics.
    ///
    /// # Panics
    /// Re-raises the panic of a task that panicked, and panics when called
    /// on an aborted task.
    pub fn try_result(&mut self) -> Option<T> {
        let mut out: Option<T> = None;
        let ptr = &mut out as *mut Option<T> as *mut ();
        // SAFETY: a JoinHandle<T> can only be constructed for a task whose
        // future outputs T.
        unsafe { self.task.try_result(ptr) };
        out
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut output: Poll<T> = Poll::Pending;
        let ptr = &mut output as *mut Poll<T> as *mut ();
        // SAFETY: a JoinHandle<T> can only be constructed for a task whose
        // future outputs T.
        unsafe { self.task.poll_join(cx, ptr) };
        output
    }
}

impl<T> Drop for JoinHandle<T> {
    fn drop(&mut self) {
        if !self.detached {
            self.task.abort();
        }
    }
}
