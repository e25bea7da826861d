//! Error taxonomy for the client, message objects and streams.
//!
//! Structural misuse (malformed URIs, bad arguments, stream capability
//! violations) fails fast at the call site. Transient network trouble is
//! mostly downgraded by the client into recorded warnings/errors and a
//! degraded response; the exception is a transport failure that carries a
//! genuine HTTP status code, which is always re-raised as [`Error::Client`].

use thiserror::Error;

/// A `Result` alias where the `Err` case is [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The string could not be decomposed into URI components.
    #[error("invalid URI: {0}")]
    InvalidUri(String),

    /// A caller-supplied value failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A stream was used outside its capability (read on write-only,
    /// any operation after close, seek on a non-seekable stream).
    #[error("{0}")]
    Stream(String),

    /// Request execution failed in a way the client does not downgrade:
    /// DNS resolution failure (code 0) or a transport failure carrying an
    /// HTTP-range status code.
    #[error("{reason}")]
    Client {
        /// Human-readable failure description.
        reason: String,
        /// HTTP status code when the transport supplied one, 0 otherwise.
        code: u16,
    },

    /// The response status line could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response body was expected to be JSON but did not parse.
    #[error("JSON error: {0}")]
    MalformedJson(String),

    /// The response shape contradicts what the caller asked for
    /// (non-JSON content type, empty body).
    #[error("unexpected content: {0}")]
    UnexpectedContent(String),

    /// Underlying I/O failure from a file-backed stream or transport.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stream capability violation.
    #[inline]
    pub fn stream(message: impl Into<String>) -> Self {
        Error::Stream(message.into())
    }

    /// Client execution failure with an optional HTTP-range code.
    #[inline]
    pub fn client(reason: impl Into<String>, code: u16) -> Self {
        Error::Client {
            reason: reason.into(),
            code,
        }
    }
}
