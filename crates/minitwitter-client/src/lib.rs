//! MiniTwitter client.
//!
//! Async request/response client for the two MiniTwitter operations. One
//! request is in flight per connection; responses arrive in request order.
//!
//! # Components
//!
//! - [`Client`]: connection wrapper with `send_message` / `get_messages`
//! - [`ClientError`]: transport, codec, and server-reported failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;

pub use client::Client;
pub use error::ClientError;
pub use minitwitter_proto::ErrorCode;
