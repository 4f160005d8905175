//! Fuzz target for the frame decoder
//!
//! Untrusted bytes off the socket must never crash the server.
//!
//! # Strategy
//!
//! - Raw bytes: arbitrary headers, lengths, and CBOR bodies
//! - Small limit: a tight payload cap exercises the size checks
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - A successful decode consumes exactly `8 + declared payload` bytes
//! - A declared payload above the limit is always rejected
//! - A decoded request re-encodes and decodes to the same value

#![no_main]

use libfuzzer_sys::fuzz_target;
use minitwitter_proto::{FrameCodec, FrameHeader, Request, Response};

const MAX_PAYLOAD: u32 = 4096;

fuzz_target!(|data: &[u8]| {
    let codec = FrameCodec::new(MAX_PAYLOAD);

    if let Ok(header) = FrameHeader::parse(data) {
        if header.payload_size() > MAX_PAYLOAD {
            assert!(codec.decode_header(data).is_err());
        }
    }

    if let Ok((request, consumed)) = codec.decode::<Request>(data) {
        let declared = codec.decode_header(data).expect("decoded frame has valid header");
        assert_eq!(consumed, FrameHeader::SIZE + declared);

        let frame = codec.encode(&request).expect("decoded request re-encodes");
        let (again, _) = codec.decode::<Request>(&frame).expect("re-encoded frame decodes");
        assert_eq!(again, request);
    }

    let _ = codec.decode::<Response>(data);
});
