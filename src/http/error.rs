use std::io;

/// Errors produced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The peer sent something that is not a well formed HTTP/1.1 message:
    /// a broken request line, an illegal header, or a stream that ended
    /// mid-message.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// A route registration or handler argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error while reading or writing the connection.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
