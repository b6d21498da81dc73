use std::any::Any;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::marker::PhantomPinned;
use std::mem::replace;
use std::panic::resume_unwind;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use super::raw_task::RawTask;

pub(crate) struct TaskRepr<F: Future> {
    /// Even though strictly speaking cells do not pin project, we consider
    /// the contents of this cell pinned.
    payload: RefCell<Payload<F>>,
    /// the waker of whoever is joining this task.
    join_waker: Cell<Option<Waker>>,
    _ph: PhantomPinned,
}

pub(crate) enum Payload<F: Future> {
    Taken,
    Aborted,
    Pending { fut: F },
    Ready { output: F::Output },
    Panicked { payload: Box<dyn Any + Send> },
}

impl<F: Future> TaskRepr<F> {
    pub fn new(fut: F) -> Self {
        TaskRepr {
            payload: RefCell::new(Payload::Pending { fut }),
            join_waker: Cell::default(),
            _ph: PhantomPinned,
        }
    }

    fn wake_join(&self) {
        let Some(waker) = self.join_waker.take() else {
            return;
        };
        waker.wake_by_ref();
        self.join_waker.set(Some(waker));
    }
}

impl<F: Future> RawTask for TaskRepr<F>
where
    F::Output: 'static,
{
    fn poll(self: Pin<&Self>, cx: &mut Context) -> Poll<()> {
        let mut payload = self.payload.borrow_mut();
        let Payload::Pending { fut } = &mut *payload else {
            // already finished or aborted: report ready so the executor
            // can drop the task.
            return Poll::Ready(());
        };
        // SAFETY:
        // we can safely project the pin because the payload future is never
        // moved: `TaskRepr` is `!Unpin` and its fields are private, so safe
        // code cannot move the future out of the cell.
        let fut = unsafe { Pin::new_unchecked(fut) };

        let Poll::Ready(output) = fut.poll(cx) else {
            return Poll::Pending;
        };
        *payload = Payload::Ready { output };
        drop(payload);
        self.wake_join();
        Poll::Ready(())
    }

    /// # Safety
    /// The caller must uphold that `out` points to a valid
    /// `Poll<F::Output>`.
    unsafe fn poll_join(self: Pin<&Self>, cx: &mut Context, out: *mut ()) {
        self.join_waker.set(Some(cx.waker().clone()));
        let payload = &mut *self.payload.borrow_mut();
        if matches!(payload, Payload::Pending { .. }) {
            return;
        }
        // the pin ended with the future, anything left may be moved.
        match replace(payload, Payload::Taken) {
            Payload::Ready { output } => {
                let out: *mut Poll<F::Output> = out.cast();
                // Safety: the caller upholds that the pointee type matches.
                unsafe { *out = Poll::Ready(output) };
            }
            Payload::Panicked { payload } => resume_unwind(payload),
            Payload::Taken => {
                panic!("polled a JoinHandle future after it returned Poll::Ready(..).")
            }
            Payload::Aborted => {
                panic!("attempted to join a task that has been aborted.")
            }
            Payload::Pending { .. } => unreachable!(),
        }
    }

    /// # Safety
    /// The caller must uphold that `out` points to a valid
    /// `Option<F::Output>`.
    unsafe fn try_result(self: Pin<&Self>, out: *mut ()) {
        let payload = &mut *self.payload.borrow_mut();
        if matches!(payload, Payload::Pending { .. }) {
            return;
        }
        match replace(payload, Payload::Taken) {
            Payload::Ready { output } => {
                let out: *mut Option<F::Output> = out.cast();
                // Safety: the caller upholds that the pointee type matches.
                unsafe { *out = Some(output) };
            }
            Payload::Panicked { payload } => resume_unwind(payload),
            Payload::Taken => panic!("the task result was already taken."),
            Payload::Aborted => panic!("attempted to read the result of an aborted task."),
            Payload::Pending { .. } => unreachable!(),
        }
    }

    /// Aborts the task, dropping its future in place. A task that aborts
    /// itself while being polled is left untouched: the payload cell is
    /// already borrowed, and the executor will retire it on the next poll.
    fn abort(self: Pin<&Self>) {
        let Ok(mut payload) = self.payload.try_borrow_mut() else {
            return;
        };
        if let Payload::Pending { .. } = &*payload {
            *payload = Payload::Aborted;
        }
        drop(payload);
        self.wake_join();
    }

    fn panic(self: Pin<&Self>, payload: Box<dyn Any + Send>) {
        *self.payload.borrow_mut() = Payload::Panicked { payload };
        self.wake_join();
    }

    fn is_done(&self) -> bool {
        !matches!(&*self.payload.borrow(), Payload::Pending { .. })
    }
}
