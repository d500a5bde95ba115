//! Fuzz target: `decode_status`
//!
//! Feeds arbitrary bytes to the status-frame decoder and asserts it never
//! panics and only accepts well-formed, checksummed frames.
//!
//! cargo fuzz run fuzz_status_frame

#![no_main]

use ethutild::protocol::frame::{STATUS_FRAME_LEN, decode_status, verify_checksum};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(status) = decode_status(data) {
        assert_eq!(data.len(), STATUS_FRAME_LEN);
        assert!(verify_checksum(data));
        assert_eq!(status.brightness, data[1]);
        assert_eq!(status.t_on, u16::from_be_bytes([data[7], data[8]]));
    }
});
