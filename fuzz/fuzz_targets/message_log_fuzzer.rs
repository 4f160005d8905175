//! Fuzz target for [`MessageLog`] against a `Vec` model
//!
//! # Strategy
//!
//! - Operation sequences: arbitrary interleavings of appends and queries
//! - Counts: the full `i64` range, including negatives and huge values
//!
//! # Invariants
//!
//! - `query_last(n)` for `n >= 0` returns the model's last `min(n, len)`
//!   entries, oldest first
//! - Negative counts are rejected and leave the log unchanged
//! - Sequence numbers equal positions
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use minitwitter_core::{LogError, MessageLog};

#[derive(Debug, Clone, Arbitrary)]
enum LogOp {
    Append(String),
    QueryLast(i64),
}

fuzz_target!(|ops: Vec<LogOp>| {
    let log = MessageLog::new();
    let mut model: Vec<String> = Vec::new();

    for op in ops {
        match op {
            LogOp::Append(content) => {
                let sequence = log.append(content.as_str());
                assert_eq!(sequence, model.len() as u64);
                model.push(content);
            },
            LogOp::QueryLast(count) if count < 0 => {
                assert_eq!(log.query_last(count), Err(LogError::InvalidArgument { count }));
            },
            LogOp::QueryLast(count) => {
                let result = log.query_last(count).expect("non-negative count");
                let take = usize::try_from(count).unwrap_or(usize::MAX).min(model.len());
                let start = model.len() - take;

                assert_eq!(result.len(), take);
                for (offset, message) in result.iter().enumerate() {
                    assert_eq!(message.sequence, (start + offset) as u64);
                    assert_eq!(&*message.content, model[start + offset].as_str());
                }
            },
        }
        assert_eq!(log.len(), model.len());
    }
});
