use crate::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};

use super::{
    getline_or_invalid, read_header_block, write_header_block, Error, HeaderMap, Method,
    RequestTarget,
};

/// An HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// The raw request target, exactly as it appeared on the request line.
    pub target: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>) -> Request {
        Request {
            method,
            target: target.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Classifies the raw target; see [`RequestTarget`].
    pub fn parse_target(&self) -> RequestTarget {
        RequestTarget::parse(&self.target)
    }

    /// Parses a request from the stream.
    ///
    /// # Errors
    /// [`Error::InvalidRequest`] on an unknown method, a request line that
    /// does not end in `HTTP/1.1`, an illegal header, or a stream that ends
    /// before the message is complete.
    pub async fn read_from<R: AsyncRead>(reader: &mut BufReader<R>) -> Result<Request, Error> {
        let line = getline_or_invalid(reader).await?;
        let line = std::str::from_utf8(&line)
            .map_err(|_| Error::InvalidRequest("request line is not valid utf-8"))?;
        let line = line.trim_end_matches(|c: char| c.is_ascii_whitespace());
        if !line.ends_with("HTTP/1.1") {
            return Err(Error::InvalidRequest(
                "request line does not end in HTTP/1.1",
            ));
        }

        let mut tokens = line.split_ascii_whitespace();
        let method = tokens
            .next()
            .ok_or(Error::InvalidRequest("request line is empty"))?;
        let method = Method::parse(method)
            .ok_or(Error::InvalidRequest("unrecognized request method"))?;
        let target = tokens
            .next()
            .ok_or(Error::InvalidRequest("request line has no target"))?
            .to_string();

        let mut request = Request::new(method, target);
        read_header_block(reader, &mut request.headers, &mut request.body).await?;
        Ok(request)
    }

    /// Serializes the request: request line, headers in sorted order, a
    /// computed `Content-Length` when the body is non-empty, and the body.
    /// The writer is not flushed.
    pub async fn write_to<W: AsyncWrite>(&self, writer: &mut BufWriter<W>) -> Result<(), Error> {
        writer.puts(self.method.as_str().as_bytes()).await?;
        writer.puts(b" ").await?;
        writer.puts(self.target.as_bytes()).await?;
        writer.puts(b" HTTP/1.1\r\n").await?;
        write_header_block(writer, &self.headers, &self.body).await
    }
}
