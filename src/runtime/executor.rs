use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::rc::Weak;
use std::task::{Context, Poll};

use crate::task::{Metadata, RawTask, SharedTask, TaskRepr};

/// The task scheduler: a FIFO ready queue plus the table of live tasks.
///
/// The table is the process wide collection of spawned tasks: an entry is
/// inserted on spawn and removed as soon as the task's poll reports ready
/// (completed, panicked, or aborted). Completion is the cleanup hook; there
/// is no periodic sweep.
pub(crate) struct Executor {
    queue: RefCell<VecDeque<SharedTask>>,
    tasks: RefCell<HashMap<u64, SharedTask>>,
    next_id: Cell<u64>,
}

impl Executor {
    pub fn new() -> Executor {
        Executor {
            queue: RefCell::new(VecDeque::new()),
            tasks: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Spawns a future as a task, scheduling it for its first poll.
    /// `executor` must be a weak handle to this executor; it ends up in the
    /// task's waker.
    pub fn spawn<F>(&self, future: F, executor: Weak<Executor>) -> SharedTask
    where
        F: Future + 'static,
    {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let task = new_task(id, executor, future);
        self.tasks.borrow_mut().insert(id, task.clone());
        self.push(task.clone());
        task
    }

    /// Enqueues a task unless it is already queued.
    pub fn push(&self, task: SharedTask) {
        if !task.set_queued(true) {
            self.queue.borrow_mut().push_back(task);
        }
    }

    pub fn has_ready(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Polls every task that was ready when the pass started. Tasks that
    /// wake themselves (or each other) during the pass run on the next one,
    /// so the reactor is never starved.
    pub fn run_queue(&self) {
        let ready = self.queue.borrow().len();
        for _ in 0..ready {
            let task = self.queue.borrow_mut().pop_front();
            let Some(task) = task else { break };
            task.set_queued(false);
            let waker = task.clone().waker();
            let cx = &mut Context::from_waker(&waker);
            match catch_unwind(AssertUnwindSafe(|| task.poll(cx))) {
                Ok(Poll::Pending) => {}
                Ok(Poll::Ready(())) => {
                    self.tasks.borrow_mut().remove(&task.id());
                }
                Err(payload) => {
                    task.panic(payload);
                    self.tasks.borrow_mut().remove(&task.id());
                }
            }
        }
    }
}

fn new_task<F>(id: u64, executor: Weak<Executor>, future: F) -> SharedTask
where
    F: Future + 'static,
{
    let meta = Metadata { id, executor };
    let raw: Pin<Box<dyn RawTask>> = Box::pin(TaskRepr::new(future));
    SharedTask::new(meta, raw)
}
