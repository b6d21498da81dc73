use crate::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};

use super::{
    getline_or_invalid, read_header_block, reason_phrase, write_header_block, Error, HeaderMap,
};

/// An HTTP/1.1 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Response {
        Response {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Parses a response from the stream (the client side of the codec).
    ///
    /// # Errors
    /// [`Error::InvalidRequest`] on a malformed status line, an illegal
    /// header, or a premature end of stream.
    pub async fn read_from<R: AsyncRead>(reader: &mut BufReader<R>) -> Result<Response, Error> {
        let line = getline_or_invalid(reader).await?;
        let line = std::str::from_utf8(&line)
            .map_err(|_| Error::InvalidRequest("status line is not valid utf-8"))?;
        let rest = line
            .strip_prefix("HTTP/1.1 ")
            .ok_or(Error::InvalidRequest("status line does not start with HTTP/1.1"))?;
        let status = rest
            .split_ascii_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or(Error::InvalidRequest("status code is not a number"))?;

        let mut response = Response::new(status);
        read_header_block(reader, &mut response.headers, &mut response.body).await?;
        Ok(response)
    }

    /// Serializes the response: status line with the registry reason
    /// phrase, headers in sorted order, a computed `Content-Length` when
    /// the body is non-empty, and the body. The writer is not flushed.
    pub async fn write_to<W: AsyncWrite>(&self, writer: &mut BufWriter<W>) -> Result<(), Error> {
        let line = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        writer.puts(line.as_bytes()).await?;
        write_header_block(writer, &self.headers, &self.body).await
    }
}
