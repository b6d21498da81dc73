use std::any::Any;
use std::pin::Pin;
use std::task::{Context, Poll};

pub(crate) trait RawTask {
    fn poll(self: Pin<&Self>, cx: &mut Context) -> Poll<()>;
    /// # Safety
    /// `out` must point to a valid `Poll<F::Output>` for the future the
    /// task was created from.
    unsafe fn poll_join(self: Pin<&Self>, cx: &mut Context, out: *mut ());
    /// # Safety
    /// `out` must point to a valid `Option<F::Output>` for the future the
    /// task was created from.
    unsafe fn try_result(self: Pin<&Self>, out: *mut ());
    fn abort(self: Pin<&Self>);
    fn panic(self: Pin<&Self>, payload: Box<dyn Any + Send>);
    fn is_done(&self) -> bool;
}
