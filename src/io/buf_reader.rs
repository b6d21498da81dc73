use std::io::{ErrorKind, Result};

use super::{hung_up, AsyncRead, IoStatus, DEFAULT_BUFFER_SIZE};

/// Buffered reader over an [`AsyncRead`].
///
/// Bytes in `[start, end)` are buffered but unread. An empty buffer
/// triggers one refill from the underlying reader per attempt. A hangup
/// that arrives together with data is held back: the buffered bytes are
/// served first and the end-of-stream error surfaces on the next refill.
pub struct BufReader<R> {
    inner: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    hup: bool,
}

impl<R: AsyncRead> BufReader<R> {
    pub fn new(inner: R) -> BufReader<R> {
        BufReader::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, inner: R) -> BufReader<R> {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        BufReader {
            inner,
            buf: vec![0; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
            hup: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Number of buffered, unread bytes.
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// Refills the empty buffer, retrying zero-byte reads until the source
    /// produces data or hangs up.
    async fn fill(&mut self) -> Result<()> {
        debug_assert_eq!(self.start, self.end);
        if self.hup {
            return Err(hung_up());
        }
        self.start = 0;
        self.end = 0;
        loop {
            let IoStatus { len, hup } = self.inner.read(&mut self.buf).await?;
            if len > 0 {
                self.end = len;
                self.hup = hup;
                return Ok(());
            }
            if hup {
                self.hup = true;
                return Err(hung_up());
            }
        }
    }

    /// Returns the next byte of the stream.
    pub async fn getchar(&mut self) -> Result<u8> {
        if self.start == self.end {
            self.fill().await?;
        }
        let byte = self.buf[self.start];
        self.start += 1;
        Ok(byte)
    }

    /// Reads exactly `n` bytes.
    pub async fn getn(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            if self.start == self.end {
                self.fill().await?;
            }
            let take = (n - out.len()).min(self.end - self.start);
            out.extend_from_slice(&self.buf[self.start..self.start + take]);
            self.start += take;
        }
        Ok(out)
    }

    /// Reads up to and excluding the first occurrence of `delim`, which may
    /// span refill boundaries. The delimiter is consumed but not returned.
    pub async fn getline(&mut self, delim: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if delim.is_empty() {
            return Ok(out);
        }
        loop {
            let byte = self.getchar().await?;
            out.push(byte);
            if out.ends_with(delim) {
                out.truncate(out.len() - delim.len());
                return Ok(out);
            }
        }
    }

    /// Reads until the peer hangs up, returning everything that arrived.
    /// The end of the stream is the expected outcome here, not an error.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            if self.start == self.end {
                match self.fill().await {
                    Ok(()) => {}
                    Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(out),
                    Err(err) => return Err(err),
                }
            }
            out.extend_from_slice(&self.buf[self.start..self.end]);
            self.start = self.end;
        }
    }

    /// Reads into `buf`, returning how many bytes were copied. Drains the
    /// internal buffer first and refills at most once; short reads are
    /// legal.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.start == self.end {
            self.fill().await?;
        }
        let take = buf.len().min(self.end - self.start);
        buf[..take].copy_from_slice(&self.buf[self.start..self.start + take]);
        self.start += take;
        Ok(take)
    }
}
