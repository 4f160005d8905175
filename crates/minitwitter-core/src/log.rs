//! Message Log
//!
//! The canonical, append-only history of every submitted message.
//!
//! ## Concurrency
//!
//! One `Mutex` guards the whole sequence. Both operations take it exactly
//! once:
//!
//! - `append` reads the length (the next sequence number) and pushes under
//!   the same guard, so no two appends share a sequence number and none are
//!   lost.
//! - `query_last` reads the length and copies the suffix under the same
//!   guard, so every result is a prefix of the true append order as of one
//!   instant. Reads never tear.
//!
//! Content is stored as `Arc<str>`, so the copy taken under the lock is a
//! reference-count bump per message rather than a string clone.
//!
//! ## Invariants
//!
//! - Order: position in the log equals the order appends acquired the lock.
//! - Density: the message at position `i` has sequence number `i`.
//! - Monotonic growth: the length never decreases.
//!
//! ## Limitations
//!
//! Nothing is ever evicted. Memory grows with every append for the life of
//! the process.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::LogError;

/// One submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Position in the total order, starting at 0.
    pub sequence: u64,
    /// Message text as submitted.
    pub content: Arc<str>,
}

/// Shared append-only message log.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Mutex<Vec<Message>>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` as the new last message.
    ///
    /// Returns the sequence number assigned to it.
    pub fn append(&self, content: impl Into<Arc<str>>) -> u64 {
        let content = content.into();
        let mut entries = self.lock();

        let sequence = entries.len() as u64;
        entries.push(Message { sequence, content });

        tracing::trace!(sequence, "appended message");
        sequence
    }

    /// Return the last `min(count, len)` messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LogError::InvalidArgument` if `count` is negative. The log is
    /// not touched in that case.
    pub fn query_last(&self, count: i64) -> Result<Vec<Message>, LogError> {
        if count < 0 {
            return Err(LogError::InvalidArgument { count });
        }
        // Counts beyond the address space can only mean "everything".
        let count = usize::try_from(count).unwrap_or(usize::MAX);

        let entries = self.lock();
        let start = entries.len().saturating_sub(count);
        Ok(entries[start..].to_vec())
    }

    /// Number of messages appended so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no message has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sequence number the next append will receive.
    pub fn next_sequence(&self) -> u64 {
        self.lock().len() as u64
    }

    // Every critical section is a single push or a read, so a guard poisoned
    // by a panicking holder still covers a whole log.
    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
