use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Wake, Waker};

/// Waker for the root future driven by `block_on`. Waking sets a flag that
/// the event loop checks before each pass.
pub(crate) struct MainWaker {
    notified: AtomicBool,
}

impl MainWaker {
    /// Starts out notified so the loop polls the root future immediately.
    pub fn new() -> Arc<MainWaker> {
        Arc::new(MainWaker {
            notified: AtomicBool::new(true),
        })
    }

    pub fn waker(self: &Arc<Self>) -> Waker {
        Waker::from(self.clone())
    }

    /// Clears and returns the notified flag.
    pub fn take(&self) -> bool {
        self.notified.swap(false, Ordering::Relaxed)
    }

    pub fn is_notified(&self) -> bool {
        self.notified.load(Ordering::Relaxed)
    }
}

impl Wake for MainWaker {
    fn wake(self: Arc<Self>) {
        self.notified.store(true, Ordering::Relaxed);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.notified.store(true, Ordering::Relaxed);
    }
}
