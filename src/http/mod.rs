//! HTTP/1.1 request/response codec, routing, and connection serving.
//!
//! Only `Content-Length` framing is implemented; a request without the
//! header has an empty body. Chunked transfer encoding, HTTP/2, and
//! streaming bodies are out of scope. Connections are served one request
//! per accept.

pub use error::Error;
pub use headers::HeaderMap;
pub use method::Method;
pub use request::Request;
pub use response::Response;
pub use router::{Handler, Router};
pub use server::{not_found, serve_connection};
pub use status::reason_phrase;
pub use uri::RequestTarget;

mod error;
mod headers;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod uri;

use crate::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};

/// Reads the header block and, when a `Content-Length` header is present,
/// exactly that many body bytes. Shared by the request and response
/// parsers.
async fn read_header_block<R: AsyncRead>(
    reader: &mut BufReader<R>,
    headers: &mut HeaderMap,
    body: &mut Vec<u8>,
) -> Result<(), Error> {
    loop {
        let line = getline_or_invalid(reader).await?;
        if line.is_empty() {
            break;
        }
        let line = std::str::from_utf8(&line)
            .map_err(|_| Error::InvalidRequest("header line is not valid utf-8"))?;
        let Some(colon) = line.find(':') else {
            return Err(Error::InvalidRequest("header line is missing a colon"));
        };
        let name = &line[..colon];
        let name_ok = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !name_ok {
            return Err(Error::InvalidRequest(
                "header name contains illegal characters",
            ));
        }
        // the whitespace around the value is optional and not significant.
        let value = line[colon + 1..].trim_matches(|c: char| c.is_ascii_whitespace());
        if value.is_empty() {
            return Err(Error::InvalidRequest("header value is empty"));
        }
        headers.insert(name, value);
    }

    if let Some(value) = headers.get("Content-Length") {
        let len: usize = value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRequest("Content-Length is not a number"))?;
        *body = reader.getn(len).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::InvalidRequest("stream ended before the full body arrived")
            }
            _ => Error::Io(err),
        })?;
    }
    Ok(())
}

/// Serializes the header block and body: headers in sorted order with any
/// caller-supplied `Content-Length` dropped, a computed `Content-Length`
/// when the body is non-empty, the blank line, then the body.
async fn write_header_block<W: AsyncWrite>(
    writer: &mut BufWriter<W>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), Error> {
    for (name, value) in headers.iter() {
        if name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }
        writer.puts(name.as_bytes()).await?;
        writer.puts(b": ").await?;
        writer.puts(value.as_bytes()).await?;
        writer.puts(b"\r\n").await?;
    }
    if !body.is_empty() {
        let line = format!("Content-Length: {}\r\n", body.len());
        writer.puts(line.as_bytes()).await?;
    }
    writer.puts(b"\r\n").await?;
    if !body.is_empty() {
        writer.puts(body).await?;
    }
    Ok(())
}

/// A CRLF line, with an early hangup reported as a malformed message.
async fn getline_or_invalid<R: AsyncRead>(reader: &mut BufReader<R>) -> Result<Vec<u8>, Error> {
    reader
        .getline(b"\r\n")
        .await
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::InvalidRequest("stream ended in the middle of a message")
            }
            _ => Error::Io(err),
        })
}
