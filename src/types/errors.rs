//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

use crate::envelope::MessageType;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the framing layer.
#[derive(Error, Debug)]
pub enum Error {
    /// A reply sender was handed an envelope whose type is not `REPLY`.
    /// This is a caller bug; nothing has been written to the socket.
    #[error("reply expected, got {found} envelope")]
    InvalidReplyType { found: MessageType },

    /// Malformed envelope or frame sequence.
    #[error("validation error: {0}")]
    Validation(String),

    /// Encoding or decoding of an opaque frame body failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O errors from the underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable error code for the dispatch layer.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidReplyType { .. } => "INVALID_REPLY_TYPE",
            Error::Validation(_) => "INVALID_ARGUMENT",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Io(_) => "TRANSPORT",
        }
    }

    /// Whether the socket may now hold a partially written envelope.
    /// Write timeouts surface here as `Io` with `ErrorKind::TimedOut`.
    ///
    /// Callers should close and reopen the socket instead of reusing it.
    pub fn socket_compromised(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_compromise_socket() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
        assert!(io.socket_compromised());
        assert_eq!(io.error_code(), "TRANSPORT");

        let timed_out = Error::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout"));
        assert!(timed_out.socket_compromised());
        assert!(!Error::validation("bad").socket_compromised());
        assert!(!Error::InvalidReplyType { found: MessageType::Call }.socket_compromised());
    }

    #[test]
    fn test_invalid_reply_type_message() {
        let err = Error::InvalidReplyType { found: MessageType::Cast };
        assert_eq!(err.to_string(), "reply expected, got CAST envelope");
        assert_eq!(err.error_code(), "INVALID_REPLY_TYPE");
    }
}
