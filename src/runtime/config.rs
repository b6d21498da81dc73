use super::Runtime;
use std::io;
use std::time::Duration;

/// Runtime configuration.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
    /// The maximum number of readiness events collected per `epoll_wait`
    /// call. Defaults to 1024.
    pub wait_events: usize,
    /// The longest the event loop will park inside `epoll_wait` when no
    /// timer bounds the wait. The loop simply parks again afterwards; this
    /// only bounds the length of a single kernel call. Defaults to 60s.
    pub max_park: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wait_events: 1024,
            max_park: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Builds a [`Runtime`] with this configuration.
    ///
    /// # Errors
    /// Errors if the epoll instance could not be created.
    pub fn build(self) -> io::Result<Runtime> {
        Runtime::with_config(self)
    }
}
