//! Fuzz target: `verify_checksum`
//!
//! Any body with a correct trailer must verify unless it sums to zero;
//! the same body with a corrupted trailer must not.
//!
//! cargo fuzz run fuzz_checksum

#![no_main]

use ethutild::protocol::frame::{checksum, verify_checksum};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = verify_checksum(data);

    let body = &data[..data.len().min(255)];
    let sum = checksum(body);
    let mut frame = body.to_vec();
    frame.extend_from_slice(&(sum as u16).to_be_bytes());
    assert_eq!(verify_checksum(&frame), sum != 0);

    if let Some(last) = frame.last_mut() {
        *last ^= 0x01;
    }
    assert!(!verify_checksum(&frame));
});
