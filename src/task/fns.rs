use super::JoinHandle;
use crate::runtime::current_unwrap;
use std::future::Future;

/// Spawns a new task onto the current runtime, returning a [`JoinHandle`]
/// for it.
///
/// The task starts running on the next event loop pass. Dropping the handle
/// cancels the task; await the handle to retrieve the output.
///
/// # Panics
/// Panics if called from the outside of a runtime context.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + 'static,
{
    current_unwrap("spawn").spawn(future)
}

/// Spawns a task that is not bound to any join handle: it keeps running
/// until its future completes, at which point the runtime removes it from
/// its task table.
///
/// # Panics
/// Panics if called from the outside of a runtime context.
pub fn detach<F>(future: F)
where
    F: Future + 'static,
{
    let mut handle = spawn(future);
    handle.detach();
}
