use std::fmt;
use std::future::{poll_fn, Future};
use std::pin::pin;
use std::task::Poll::*;
use std::time::Duration;

use super::sleep;

/// Error returned by [`timeout`] when the duration elapses first.
#[derive(Debug, PartialEq, Eq)]
pub struct Elapsed(pub(crate) ());

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("deadline has elapsed")
    }
}

impl std::error::Error for Elapsed {}

/// Requires a future to complete before `dur` has elapsed.
///
/// If the future completes first its value is returned; otherwise
/// [`Elapsed`] is returned and the future is dropped, cancelling it. The
/// deadline is checked before polling the future, so a future that never
/// yields can complete past the deadline without an error.
///
/// # Cancellation
/// Dropping the returned future drops both the inner future and the sleep;
/// their timer and readiness registrations go with them.
///
/// # Panics
/// Panics if polled outside a runtime context.
pub async fn timeout<F: Future>(future: F, dur: Duration) -> Result<F::Output, Elapsed> {
    let mut future = pin!(future);
    let mut sleep = pin!(sleep(dur));
    poll_fn(move |cx| {
        if sleep.as_mut().poll(cx).is_ready() {
            return Ready(Err(Elapsed(())));
        }
        if let Ready(value) = future.as_mut().poll(cx) {
            return Ready(Ok(value));
        }
        Pending
    })
    .await
}
