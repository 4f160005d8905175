//! Client error types.

use minitwitter_proto::{ErrorCode, FrameError};
use thiserror::Error;

/// Errors from client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting or socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding or decoding failed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Server rejected the request.
    #[error("server error ({code}): {message}")]
    Server {
        /// Failure category reported by the server.
        code: ErrorCode,
        /// Description reported by the server.
        message: String,
    },

    /// Server answered with the wrong response kind.
    #[error("unexpected response: expected {expected}")]
    UnexpectedResponse {
        /// Response kind the request calls for.
        expected: &'static str,
    },

    /// Server closed the connection before responding.
    #[error("connection closed by server")]
    ConnectionClosed,
}

impl ClientError {
    /// Returns true if the connection should be discarded.
    ///
    /// Any server-reported error arrived as a whole response frame, so the
    /// connection is still usable; everything else means the stream may be
    /// mid-frame or gone.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Server { .. } => false,
            Self::Frame(e) => e.is_fatal(),
            Self::Io(_) | Self::UnexpectedResponse { .. } | Self::ConnectionClosed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_is_not_fatal() {
        let err = ClientError::Server {
            code: ErrorCode::InvalidArgument,
            message: "count must be non-negative".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn internal_server_error_is_not_fatal() {
        let err = ClientError::Server {
            code: ErrorCode::Internal,
            message: "payload too large: 290 bytes (max 128)".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn connection_closed_is_fatal() {
        assert!(ClientError::ConnectionClosed.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = ClientError::Server {
            code: ErrorCode::InvalidArgument,
            message: "bad count".to_string(),
        };
        assert_eq!(err.to_string(), "server error (INVALID_ARGUMENT): bad count");
    }
}
