//! MiniTwitter wire protocol.
//!
//! Two request/response operations travel over a byte stream as frames:
//!
//! ```text
//! +-------+---------+----------+--------------------+------------------+
//! | magic | version | reserved | payload length     | CBOR payload ... |
//! | "MT"  | 1 byte  | 1 byte   | 4 bytes big-endian |                  |
//! +-------+---------+----------+--------------------+------------------+
//! ```
//!
//! The payload is a CBOR-encoded [`Request`] (client to server) or
//! [`Response`] (server to client).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod frame;
pub mod io;
pub mod messages;

pub use errors::FrameError;
pub use frame::{DEFAULT_MAX_PAYLOAD_SIZE, FrameCodec, FrameHeader, MAGIC, VERSION};
pub use io::{read_frame, write_frame};
pub use messages::{
    ErrorCode, ErrorResponse, GetMessagesRequest, MessageListResponse, MessageResponse, Request,
    Response, STATUS_MESSAGE_SENT, STATUS_MESSAGES_RETRIEVED, SendMessageRequest,
};
