use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// The branch a [`race`] resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<A, B> {
    Left(A),
    Right(B),
}

/// Runs two branches concurrently, resolving to the output of whichever
/// completes first.
///
/// The losing branch is dropped as soon as the race resolves: its future is
/// destroyed at its current suspension point, which removes any timer or
/// readiness registrations it holds. The left branch is polled first, so it
/// wins ties.
///
/// ```
/// # horus::block_on(async {
/// use horus::future::{race, Either};
/// use horus::time::{sleep, Duration};
///
/// let winner = race(
///     async { sleep(Duration::from_millis(5)).await; 'a' },
///     async { sleep(Duration::from_millis(50)).await; 'b' },
/// )
/// .await;
/// assert_eq!(winner, Either::Left('a'));
/// # }).unwrap();
/// ```
pub fn race<A: Future, B: Future>(left: A, right: B) -> Race<A, B> {
    Race { left, right }
}

/// Future returned by [`race`].
pub struct Race<A, B> {
    left: A,
    right: B,
}

impl<A: Future, B: Future> Future for Race<A, B> {
    type Output = Either<A::Output, B::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // SAFETY: the branches are never moved out of the struct; they are
        // only polled through reborrowed pins.
        let race = unsafe { self.get_unchecked_mut() };
        // Safety: see above.
        let left = unsafe { Pin::new_unchecked(&mut race.left) };
        if let Poll::Ready(output) = left.poll(cx) {
            return Poll::Ready(Either::Left(output));
        }
        // Safety: see above.
        let right = unsafe { Pin::new_unchecked(&mut race.right) };
        if let Poll::Ready(output) = right.poll(cx) {
            return Poll::Ready(Either::Right(output));
        }
        Poll::Pending
    }
}

/// Runs a homogeneous set of branches concurrently, resolving to
/// `(index, output)` of the first one to complete. Losing branches are
/// dropped when the race resolves. Lower indices win ties.
///
/// # Panics
/// Panics if `branches` is empty.
pub fn race_all<F: Future>(branches: Vec<F>) -> RaceAll<F> {
    assert!(!branches.is_empty(), "race_all requires at least one branch");
    RaceAll { branches }
}

/// Future returned by [`race_all`].
pub struct RaceAll<F> {
    branches: Vec<F>,
}

impl<F: Future> Future for RaceAll<F> {
    type Output = (usize, F::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // SAFETY: the vector is never resized after construction and the
        // branches are never moved out; each is polled in place.
        let race = unsafe { self.get_unchecked_mut() };
        for (index, branch) in race.branches.iter_mut().enumerate() {
            // Safety: see above.
            let branch = unsafe { Pin::new_unchecked(branch) };
            if let Poll::Ready(output) = branch.poll(cx) {
                return Poll::Ready((index, output));
            }
        }
        Poll::Pending
    }
}
