use super::SharedTask;
use std::mem::forget;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// Builds a waker whose wake operation pushes the task onto its executor's
/// ready queue. The runtime is single threaded, so wakes always originate
/// on the thread that owns the queue.
pub(crate) fn waker(task: SharedTask) -> Waker {
    let raw = raw_waker(task.into_ptr());
    // Safety: the vtable below upholds the RawWaker contract: clone
    // increments the task's reference count, wake and drop release it.
    unsafe { Waker::from_raw(raw) }
}

fn raw_waker(data: *const ()) -> RawWaker {
    RawWaker::new(data, &RAW_WAKER_VTABLE)
}

const RAW_WAKER_VTABLE: RawWakerVTable = {
    let clone = |data: *const ()| {
        // Safety: `data` came from `SharedTask::into_ptr`.
        let task = unsafe { SharedTask::from_ptr(data) };
        let new = task.clone();
        forget(task);
        raw_waker(new.into_ptr())
    };

    let wake = |data: *const ()| {
        // Safety: `data` came from `SharedTask::into_ptr`; this consumes
        // the waker's reference.
        let task = unsafe { SharedTask::from_ptr(data) };
        task.schedule();
    };

    let wake_by_ref = |data: *const ()| {
        // Safety: `data` came from `SharedTask::into_ptr`; the reference
        // is borrowed, not consumed.
        let task = unsafe { SharedTask::from_ptr(data) };
        task.schedule();
        forget(task);
    };

    let drop = |data: *const ()| {
        // Safety: `data` came from `SharedTask::into_ptr`; this releases
        // the waker's reference.
        unsafe { SharedTask::from_ptr(data) };
    };

    RawWakerVTable::new(clone, wake, wake_by_ref, drop)
};
