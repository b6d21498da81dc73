use crate::runtime::Executor;
use std::rc::Weak;

/// Task related metadata.
pub(crate) struct Metadata {
    /// unique id for the task.
    pub id: u64,
    /// the executor the task was spawned on. Weak, so that an abandoned
    /// runtime can be freed even while suspended tasks still hold wakers.
    pub executor: Weak<Executor>,
}
