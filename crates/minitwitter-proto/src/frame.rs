//! Frame header and codec.
//!
//! # Invariants
//!
//! - Every encoded frame is exactly `FrameHeader::SIZE + payload_size` bytes.
//! - The codec never allocates more than `max_payload_size` for a payload,
//!   whatever the header declares.
//! - Decoding arbitrary bytes returns an error, never panics.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Serialize, de::DeserializeOwned};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    byteorder::{BigEndian, U32},
};

use crate::errors::FrameError;

/// Protocol magic at the start of every frame.
pub const MAGIC: [u8; 2] = *b"MT";

/// Current protocol version.
pub const VERSION: u8 = 1;

/// Default payload limit (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

/// Fixed 8-byte frame header.
///
/// Layout is fixed by `#[repr(C)]` with only byte-aligned fields, so the
/// struct maps directly onto the wire without padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct FrameHeader {
    magic: [u8; 2],
    version: u8,
    reserved: u8,
    payload_size: U32<BigEndian>,
}

impl FrameHeader {
    /// Size of the header on the wire.
    pub const SIZE: usize = 8;

    /// Create a header for a payload of the given size.
    pub fn new(payload_size: u32) -> Self {
        Self { magic: MAGIC, version: VERSION, reserved: 0, payload_size: U32::new(payload_size) }
    }

    /// Declared payload length in bytes.
    pub fn payload_size(&self) -> u32 {
        self.payload_size.get()
    }

    /// Protocol version carried in the header.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Borrow a header from the front of `buf`.
    pub fn parse(buf: &[u8]) -> Result<&Self, FrameError> {
        let bytes = buf
            .get(..Self::SIZE)
            .ok_or(FrameError::TooShort { expected: Self::SIZE, actual: buf.len() })?;
        Self::ref_from_bytes(bytes)
            .map_err(|_| FrameError::TooShort { expected: Self::SIZE, actual: buf.len() })
    }
}

/// Encodes and decodes frames under a payload size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    max_payload_size: u32,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_SIZE)
    }
}

impl FrameCodec {
    /// Create a codec that rejects payloads larger than `max_payload_size`.
    pub fn new(max_payload_size: u32) -> Self {
        Self { max_payload_size }
    }

    /// Configured payload limit.
    pub fn max_payload_size(&self) -> u32 {
        self.max_payload_size
    }

    /// Serialize `message` as CBOR and wrap it in a frame.
    pub fn encode<T: Serialize>(&self, message: &T) -> Result<Bytes, FrameError> {
        let mut payload = Vec::new();
        ciborium::into_writer(message, &mut payload)
            .map_err(|e| FrameError::Cbor(e.to_string()))?;

        let size = self.check_size(payload.len())?;
        let header = FrameHeader::new(size);

        let mut buf = BytesMut::with_capacity(FrameHeader::SIZE + payload.len());
        buf.put_slice(header.as_bytes());
        buf.put_slice(&payload);
        Ok(buf.freeze())
    }

    /// Validate a header and return the payload length it declares.
    pub fn decode_header(&self, buf: &[u8]) -> Result<usize, FrameError> {
        let header = FrameHeader::parse(buf)?;

        if header.magic != MAGIC {
            return Err(FrameError::BadMagic(header.magic));
        }
        if header.version != VERSION {
            return Err(FrameError::UnsupportedVersion(header.version));
        }

        let declared = header.payload_size() as usize;
        self.check_size(declared)?;
        Ok(declared)
    }

    /// Deserialize a CBOR payload (without header).
    pub fn decode_payload<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, FrameError> {
        self.check_size(payload.len())?;
        ciborium::from_reader(payload).map_err(|e| FrameError::Cbor(e.to_string()))
    }

    /// Decode one complete frame from the front of `buf`.
    ///
    /// Returns the message and the number of bytes consumed.
    pub fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<(T, usize), FrameError> {
        let payload_len = self.decode_header(buf)?;
        let end = FrameHeader::SIZE + payload_len;

        let payload = buf.get(FrameHeader::SIZE..end).ok_or(FrameError::Truncated {
            expected: payload_len,
            actual: buf.len() - FrameHeader::SIZE,
        })?;

        let message = self.decode_payload(payload)?;
        Ok((message, end))
    }

    fn check_size(&self, size: usize) -> Result<u32, FrameError> {
        match u32::try_from(size) {
            Ok(s) if s <= self.max_payload_size => Ok(s),
            _ => Err(FrameError::PayloadTooLarge { size, max: self.max_payload_size }),
        }
    }
}
