//! MiniTwitter core.
//!
//! A shared, append-only message log and the service logic that maps the two
//! wire operations onto it. Nothing here performs I/O; the server crate owns
//! sockets and tasks and calls into [`MiniTwitterService`].
//!
//! ## Architecture
//!
//! ```text
//! minitwitter-core
//!   ├─ MessageLog          (append / query_last under one lock)
//!   └─ MiniTwitterService  (Request -> Response, logging)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod log;
pub mod service;

pub use error::LogError;
pub use log::{Message, MessageLog};
pub use service::MiniTwitterService;
