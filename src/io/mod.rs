//! Buffered byte streams over best-effort readers and writers.
//!
//! The traits in this module deliberately expose partial progress: one
//! readiness wait, one syscall, and whatever the kernel gave back. The
//! [`BufReader`] and [`BufWriter`] wrappers turn that into the usual
//! byte-at-a-time and line-oriented operations.

pub use buf_reader::BufReader;
pub use buf_writer::BufWriter;

mod buf_reader;
mod buf_writer;

use std::future::Future;
use std::io::{Error, ErrorKind, Result};

/// Default capacity of stream buffers: 8 KiB.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Outcome of one best-effort read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IoStatus {
    /// Bytes transferred. Zero is legal and does not imply end of stream on
    /// its own.
    pub len: usize,
    /// The peer hung up. Remaining buffered bytes (if `len > 0`) are still
    /// valid; the stream ends after them.
    pub hup: bool,
}

/// A best-effort asynchronous reader: waits until the source is readable,
/// reads once, reports the progress. Short reads are legal.
pub trait AsyncRead {
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<IoStatus>>;
}

/// A best-effort asynchronous writer. Short writes are legal.
pub trait AsyncWrite {
    fn write(&mut self, buf: &[u8]) -> impl Future<Output = Result<IoStatus>>;
}

impl AsyncRead for crate::AsyncFile {
    async fn read(&mut self, buf: &mut [u8]) -> Result<IoStatus> {
        crate::reactor::op::read_best_effort(self.fd(), buf).await
    }
}

impl AsyncRead for &crate::AsyncFile {
    async fn read(&mut self, buf: &mut [u8]) -> Result<IoStatus> {
        crate::reactor::op::read_best_effort(self.fd(), buf).await
    }
}

impl AsyncWrite for crate::AsyncFile {
    async fn write(&mut self, buf: &[u8]) -> Result<IoStatus> {
        crate::reactor::op::write_best_effort(self.fd(), buf).await
    }
}

impl AsyncWrite for &crate::AsyncFile {
    async fn write(&mut self, buf: &[u8]) -> Result<IoStatus> {
        crate::reactor::op::write_best_effort(self.fd(), buf).await
    }
}

pub(crate) fn hung_up() -> Error {
    Error::new(ErrorKind::UnexpectedEof, "the peer hung up")
}
