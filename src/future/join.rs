use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Waits on multiple concurrent branches, returning when **all** branches
/// complete.
///
/// The branches are evaluated concurrently on the same task and their
/// outputs are returned as a tuple, in argument order. The first branch is
/// polled first, so branches start in argument order.
///
/// With branches returning `Result`, `join!` still waits for every branch
/// to finish; applying `?` to the tuple elements afterwards reports the
/// first failure in argument order while guaranteeing the other branches
/// already ran to completion:
///
/// ```
/// # horus::block_on(async {
/// use horus::time::{sleep, Duration};
///
/// let (a, b) = horus::join!(
///     async { sleep(Duration::from_millis(10)).await; 1 },
///     async { 2 },
/// );
/// assert_eq!((a, b), (1, 2));
/// # }).unwrap();
/// ```
///
/// A panicking branch does not cut the join short either: the panic is
/// captured, the remaining branches keep running, and the first captured
/// payload is re-raised once every branch has completed. Panics of later
/// branches are discarded.
#[macro_export]
macro_rules! join {
    ($($input:expr),+ $(,)?) => {{
        $crate::future::Join::<($($crate::join!(@ignore $input),)+)>::new(($($input,)+)).await
    }};
    (@ignore $tokens:expr) => { _ };
}

/// Future driving a tuple of branches to completion. Created by
/// [`join!`](crate::join).
pub struct Join<T> {
    cells: Option<T>,
    panic: Option<Box<dyn Any + Send>>,
}

/// State of one `join!` branch.
pub enum Branch<F: Future> {
    Pending(F),
    Done(F::Output),
    Panicked,
}

macro_rules! implement_join_for_tuple {
    (
        types: [$($types:ident,)*],
        digits: [$($index:tt,)*]
    ) => {
        #[allow(nonstandard_style, unused_variables, irrefutable_let_patterns)]
        impl<$($types,)*> Join<($($types,)*)>
        where
            $($types: Future,)*
        {
            pub fn new(($($types,)*): ($($types,)*)) -> Join<($(Branch<$types>,)*)> {
                Join {
                    cells: Some(($(Branch::Pending($types),)*)),
                    panic: None,
                }
            }
        }

        #[allow(nonstandard_style, unused_variables, irrefutable_let_patterns)]
        impl<$($types,)*> Future for Join<(
            $(Branch<$types>,)*
        )>
        where
            $($types: Future,)*
        {
            type Output = ($($types::Output,)*);

            fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
                // SAFETY: the pending branch futures are never moved: they
                // live inside the cells tuple until they complete, and the
                // tuple is only taken once every branch has finished.
                let join = unsafe { self.get_unchecked_mut() };
                let cells = join.cells.as_mut().expect("polled `join!` after completion");

                $(
                    if let Branch::Pending(fut) = &mut cells.$index {
                        // SAFETY: see above, the future is pinned in place.
                        let fut = unsafe { Pin::new_unchecked(fut) };
                        match catch_unwind(AssertUnwindSafe(|| fut.poll(&mut *cx))) {
                            Ok(Poll::Pending) => {}
                            Ok(Poll::Ready(output)) => {
                                // overwriting drops the completed future in
                                // place, which is fine under the pin
                                // contract.
                                cells.$index = Branch::Done(output);
                            }
                            Err(payload) => {
                                // the first panic wins; the others are
                                // discarded. The remaining branches still
                                // run to completion before it is re-raised.
                                if join.panic.is_none() {
                                    join.panic = Some(payload);
                                }
                                cells.$index = Branch::Panicked;
                            }
                        }
                    }
                )*

                let all_done = $(!matches!(&cells.$index, Branch::Pending(_)))&&*;
                if !all_done {
                    return Poll::Pending;
                }

                if let Some(payload) = join.panic.take() {
                    resume_unwind(payload);
                }

                let Some(($(Branch::Done($types),)*)) = join.cells.take() else {
                    unreachable!()
                };
                Poll::Ready(($($types,)*))
            }
        }

    };
}

implement_join_for_tuple!(types: [A0,], digits: [0,]);
implement_join_for_tuple!(types: [A0, A1,], digits: [0, 1,]);
implement_join_for_tuple!(types: [A0, A1, A2,], digits: [0, 1, 2,]);
implement_join_for_tuple!(types: [A0, A1, A2, A3,], digits: [0, 1, 2, 3,]);
implement_join_for_tuple!(types: [A0, A1, A2, A3, A4,], digits: [0, 1, 2, 3, 4,]);
implement_join_for_tuple!(types: [A0, A1, A2, A3, A4, A5,], digits: [0, 1, 2, 3, 4, 5,]);
implement_join_for_tuple!(types: [A0, A1, A2, A3, A4, A5, A6,], digits: [0, 1, 2, 3, 4, 5, 6,]);
implement_join_for_tuple!(types: [A0, A1, A2, A3, A4, A5, A6, A7,], digits: [0, 1, 2, 3, 4, 5, 6, 7,]);
