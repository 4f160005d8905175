//! Frame codec errors.

use thiserror::Error;

/// Errors produced while encoding, decoding, or transferring frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Buffer is shorter than the fixed header.
    #[error("frame too short: need {expected} bytes, got {actual}")]
    TooShort {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Header does not start with the protocol magic.
    #[error("bad magic: {0:02x?}")]
    BadMagic([u8; 2]),

    /// Header carries a version this codec does not speak.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Declared or actual payload exceeds the configured limit.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size in bytes.
        size: usize,
        /// Configured maximum.
        max: u32,
    },

    /// Stream ended inside a header or before the declared payload was read.
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Header size or declared payload length.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Payload is not valid CBOR for the expected message type.
    #[error("CBOR error: {0}")]
    Cbor(String),

    /// Underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Returns true if the stream can no longer be trusted to be on a frame
    /// boundary.
    ///
    /// A payload that fails to deserialize was still fully consumed, so the
    /// next frame can be read. Anything wrong with the header (or the stream
    /// itself) leaves the reader at an unknown offset.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cbor(_))
    }
}
