//! A single threaded, epoll based async runtime with just enough networking
//! and HTTP/1.1 plumbing to write small servers.
//!
//! Horus bundles three cooperating pieces:
//!
//! * A cooperative [task](crate::task) scheduler. Tasks are plain futures
//!   driven by a poll loop, so deep `await` chains never grow the native
//!   stack.
//! * A dual event source: a [timer queue](crate::time) ordered by deadline
//!   and an epoll reactor for file descriptor readiness. The event loop
//!   alternates between them and parks the thread when only timers remain.
//! * Buffered [streams](crate::io) over non blocking descriptors, plus an
//!   [HTTP/1.1 codec and router](crate::http) on top of them.
//!
//! Everything runs on the calling thread; there are no locks and no
//! cross-thread handoffs. A blocking call inside a task stalls the whole
//! loop.
//!
//! ```no_run
//! use horus::net::TcpListener;
//!
//! #[horus::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8000".parse().unwrap())?;
//!     loop {
//!         let (stream, _addr) = listener.accept().await?;
//!         horus::detach(async move {
//!             let mut buf = [0; 1024];
//!             loop {
//!                 let Ok(chunk) = stream.read(&mut buf).await else {
//!                     break;
//!                 };
//!                 if chunk.len == 0 {
//!                     break;
//!                 }
//!                 if stream.write_all(&buf[..chunk.len]).await.is_err() {
//!                     break;
//!                 }
//!             }
//!         });
//!     }
//! }
//! ```
#![warn(clippy::undocumented_unsafe_blocks)]

pub use horus_macros::{main, test};

pub use fd::AsyncFile;
pub use runtime::block_on;
pub use task::{detach, spawn, JoinHandle};

mod utils;

pub mod fd;
pub mod future;
pub mod http;
pub mod io;
pub mod net;
pub(crate) mod reactor;
pub mod runtime;
pub mod task;
pub mod time;
