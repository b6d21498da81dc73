use std::io::Result;

use super::{hung_up, AsyncWrite, IoStatus, DEFAULT_BUFFER_SIZE};

/// Buffered writer over an [`AsyncWrite`].
///
/// Bytes in `[0, end)` are pending. The buffer is flushed when it runs
/// full; [`flush`](BufWriter::flush) must be called explicitly before the
/// writer is dropped, there is no implicit flush on drop.
pub struct BufWriter<W> {
    inner: W,
    buf: Box<[u8]>,
    end: usize,
}

impl<W: AsyncWrite> BufWriter<W> {
    pub fn new(inner: W) -> BufWriter<W> {
        BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, inner: W) -> BufWriter<W> {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        BufWriter {
            inner,
            buf: vec![0; capacity].into_boxed_slice(),
            end: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Number of buffered, unflushed bytes.
    pub fn buffered(&self) -> usize {
        self.end
    }

    /// Appends one byte, flushing first if the buffer is full.
    pub async fn putchar(&mut self, byte: u8) -> Result<()> {
        if self.end == self.buf.len() {
            self.flush().await?;
        }
        self.buf[self.end] = byte;
        self.end += 1;
        Ok(())
    }

    /// Appends a byte slice. A slice that does not fit in the free space
    /// skips the buffer: pending bytes are flushed and the slice is written
    /// through directly, avoiding the double copy.
    pub async fn puts(&mut self, bytes: &[u8]) -> Result<()> {
        let free = self.buf.len() - self.end;
        if bytes.len() <= free {
            self.buf[self.end..self.end + bytes.len()].copy_from_slice(bytes);
            self.end += bytes.len();
            return Ok(());
        }
        self.flush().await?;
        self.write_direct(bytes).await
    }

    /// Writes all pending bytes to the underlying writer, looping over
    /// partial writes.
    pub async fn flush(&mut self) -> Result<()> {
        let mut written = 0;
        while written < self.end {
            let IoStatus { len, hup } = self.inner.write(&self.buf[written..self.end]).await?;
            if len == 0 && hup {
                return Err(hung_up());
            }
            written += len;
        }
        self.end = 0;
        Ok(())
    }

    async fn write_direct(&mut self, bytes: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < bytes.len() {
            let IoStatus { len, hup } = self.inner.write(&bytes[written..]).await?;
            if len == 0 && hup {
                return Err(hung_up());
            }
            written += len;
        }
        Ok(())
    }
}
