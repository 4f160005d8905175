//! Request and response payloads.
//!
//! Requests flow client to server, responses server to client. Each request
//! gets exactly one response on the same connection, in order.

use serde::{Deserialize, Serialize};

/// Status returned after a message is appended.
pub const STATUS_MESSAGE_SENT: &str = "Message sent successfully";

/// Status returned with a batch of recent messages.
pub const STATUS_MESSAGES_RETRIEVED: &str = "Messages retrieved successfully";

/// Submit one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message text. Empty strings are accepted.
    pub message: String,
}

/// Fetch the most recent messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMessagesRequest {
    /// How many messages to return. Negative values are rejected by the
    /// server with [`ErrorCode::InvalidArgument`].
    pub count: i64,
}

/// Acknowledgement for [`SendMessageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable status.
    pub status: String,
}

/// Reply to [`GetMessagesRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageListResponse {
    /// Message contents, oldest first.
    pub messages: Vec<String>,
    /// Human-readable status.
    pub status: String,
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Request was well-formed but an argument was out of range.
    InvalidArgument,
    /// Payload could not be decoded as a request.
    MalformedRequest,
    /// Server-side failure unrelated to the request.
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

/// Failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Failure category.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

/// Client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Append a message to the log.
    SendMessage(SendMessageRequest),
    /// Read the most recent messages.
    GetMessages(GetMessagesRequest),
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Reply to [`Request::SendMessage`].
    MessageSent(MessageResponse),
    /// Reply to [`Request::GetMessages`].
    MessageList(MessageListResponse),
    /// Either request failed.
    Error(ErrorResponse),
}

impl Response {
    /// Status string carried by any response variant.
    pub fn status(&self) -> &str {
        match self {
            Self::MessageSent(r) => &r.status,
            Self::MessageList(r) => &r.status,
            Self::Error(r) => &r.message,
        }
    }

    /// Whether this response reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
