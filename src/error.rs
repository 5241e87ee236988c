//! NNTP error types

use thiserror::Error;

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection timeout
    #[error("Connection timeout")]
    Timeout,

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// The server's reply code did not match the caller's expectation.
    ///
    /// Carries the actual code and message text so callers can distinguish
    /// "command worked but returned an unexpected state" from a wire-format
    /// violation. Recoverable.
    #[error("unexpected reply {code} {message}")]
    UnexpectedReply {
        /// NNTP reply code (e.g. 411, 430, 502)
        code: u16,
        /// Message text from the server
        message: String,
    },

    /// Status line too short or missing the space after the code
    #[error("short status line: {0}")]
    ShortStatusLine(String),

    /// Status line does not start with three ASCII digits
    #[error("invalid status code: {0}")]
    InvalidStatusCode(String),

    /// Malformed multi-line record (short group line, bad counts, etc.)
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Header line without a colon, or a field name containing whitespace
    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    /// Header block ended before the blank-line terminator
    #[error("unexpected end of header block")]
    UnexpectedHeaderEof,
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
