//! Message log errors.

use thiserror::Error;

/// Errors from [`MessageLog`](crate::MessageLog) operations.
///
/// Appends cannot fail short of allocation failure, which aborts the process
/// and is not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// `query_last` was called with a negative count.
    #[error("invalid argument: count must be non-negative, got {count}")]
    InvalidArgument {
        /// The rejected count.
        count: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LogError::InvalidArgument { count: -3 };
        assert_eq!(err.to_string(), "invalid argument: count must be non-negative, got -3");
    }
}
