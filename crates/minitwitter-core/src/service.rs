//! Service layer.
//!
//! Maps the two wire operations onto the shared [`MessageLog`]:
//!
//! - `SendMessage(message)` -> `append(message)`
//! - `GetMessages(count)` -> `query_last(count)`, contents only
//!
//! The service is cheap to clone; clones share one log.

use std::sync::Arc;

use minitwitter_proto::{
    ErrorCode, ErrorResponse, MessageListResponse, MessageResponse, Request, Response,
    STATUS_MESSAGE_SENT, STATUS_MESSAGES_RETRIEVED,
};

use crate::{error::LogError, log::MessageLog};

/// Request handler shared by every connection.
#[derive(Debug, Clone, Default)]
pub struct MiniTwitterService {
    log: Arc<MessageLog>,
}

impl MiniTwitterService {
    /// Create a service over a fresh, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service over an existing log.
    pub fn with_log(log: Arc<MessageLog>) -> Self {
        Self { log }
    }

    /// The underlying log.
    pub fn log(&self) -> &Arc<MessageLog> {
        &self.log
    }

    /// Append a message and acknowledge it.
    pub fn send_message(&self, message: String) -> MessageResponse {
        let content: Arc<str> = message.into();
        let sequence = self.log.append(Arc::clone(&content));
        tracing::info!(sequence, "Received message: '{}'", content);

        MessageResponse { status: STATUS_MESSAGE_SENT.to_string() }
    }

    /// Return the contents of the last `count` messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LogError::InvalidArgument` if `count` is negative.
    pub fn get_messages(&self, count: i64) -> Result<MessageListResponse, LogError> {
        let messages: Vec<String> = self
            .log
            .query_last(count)
            .inspect_err(|e| tracing::warn!("Rejected message query: {}", e))?
            .into_iter()
            .map(|m| m.content.to_string())
            .collect();

        tracing::info!("Retrieving last {} messages - Sent: {:?}", count, messages);

        Ok(MessageListResponse { messages, status: STATUS_MESSAGES_RETRIEVED.to_string() })
    }

    /// Handle one decoded request.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::SendMessage(req) => Response::MessageSent(self.send_message(req.message)),
            Request::GetMessages(req) => match self.get_messages(req.count) {
                Ok(list) => Response::MessageList(list),
                Err(e) => Response::Error(e.into()),
            },
        }
    }
}

impl From<LogError> for ErrorResponse {
    fn from(err: LogError) -> Self {
        let code = match err {
            LogError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
        };
        Self { code, message: err.to_string() }
    }
}
