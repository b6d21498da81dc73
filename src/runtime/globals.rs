use super::Runtime;
use std::cell::RefCell;

thread_local! {
    /// The runtime context the current thread is in, if any.
    pub(crate) static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Returns a handle to the currently running [`Runtime`], if the thread is
/// inside a runtime context.
#[must_use]
pub fn current() -> Option<Runtime> {
    RUNTIME.with(|cell| cell.borrow().clone())
}

#[track_caller]
#[inline]
pub(crate) fn current_unwrap(fun: &str) -> Runtime {
    let Some(rt) = current() else {
        panic!("called `{fun}` from the outside of a runtime context.")
    };
    rt
}
