//! Checksummed command/status frame codec.
//!
//! Command frame (host → chip), 12 bytes:
//! ```text
//! ┌──────┬──────┬──────┬──────┬──────┬────┬────┬────┬────┬────┬───────┬───────┐
//! │ led  │ 0xA0 │ 0x01 │ 0x00 │ 0x00 │ op │ p0 │ p1 │ p2 │ p3 │ sum_hi│ sum_lo│
//! └──────┴──────┴──────┴──────┴──────┴────┴────┴────┴────┴────┴───────┴───────┘
//! ```
//! The checksum is the big-endian 16-bit sum of bytes 0..10, computed while
//! byte 0 still holds the zero placeholder; the LED index is patched in
//! afterwards.
//!
//! Status frame (chip → host), 11 bytes:
//! ```text
//! ┌──────┬────────────┬───┬───┬───┬──────────┬─────────┬───────┬───────┐
//! │ mode │ brightness │ r │ g │ b │ t_high BE│ t_low BE│ sum_hi│ sum_lo│
//! └──────┴────────────┴───┴───┴───┴──────────┴─────────┴───────┴───────┘
//! ```

use log::debug;

use super::{LedId, Opcode, RgbColor};
use crate::error::{Error, ProtocolError, Result};

/// Length of a command frame on the wire.
pub const CMD_FRAME_LEN: usize = 12;

/// Length of a status frame as returned by the chip.
pub const STATUS_FRAME_LEN: usize = 11;

/// Trailing checksum size.
const CHECKSUM_LEN: usize = 2;

/// Fixed command header following the LED byte.
const CMD_HEADER: [u8; 4] = [0xa0, 0x01, 0x00, 0x00];

pub type CommandFrame = [u8; CMD_FRAME_LEN];

/// Up to four one-byte command parameters; absent slots go out as 0.
pub type CommandParams = [Option<u8>; 4];

// ── Checksum ──────────────────────────────────────────────────

/// Additive checksum over `data`, accumulated without truncation.
pub fn checksum(data: &[u8]) -> u32 {
    data.iter().map(|&b| u32::from(b)).sum()
}

/// Check the trailing big-endian checksum of `frame`.
///
/// A sum of zero is never accepted: an absent or powered-off chip reads back
/// as all zeros, which would otherwise match its own zero trailer.
pub fn verify_checksum(frame: &[u8]) -> bool {
    if frame.len() < CHECKSUM_LEN {
        return false;
    }
    let (body, trailer) = frame.split_at(frame.len() - CHECKSUM_LEN);
    let sum = checksum(body);
    let expected = u16::from_be_bytes([trailer[0], trailer[1]]);
    sum != 0 && sum == u32::from(expected)
}

// ── Command frames ────────────────────────────────────────────

/// Build a command frame with the LED byte left as a zero placeholder.
pub fn build_command(opcode: Opcode, params: CommandParams) -> CommandFrame {
    let mut frame = [0u8; CMD_FRAME_LEN];
    frame[1..5].copy_from_slice(&CMD_HEADER);
    frame[5] = opcode.code();
    for (slot, param) in frame[6..10].iter_mut().zip(params) {
        *slot = param.unwrap_or(0);
    }
    let sum = checksum(&frame[..CMD_FRAME_LEN - CHECKSUM_LEN]) as u16;
    frame[10..].copy_from_slice(&sum.to_be_bytes());
    frame
}

/// Build a command frame and patch in the target LED.
pub fn command_for(id: LedId, opcode: Opcode, params: CommandParams) -> CommandFrame {
    let mut frame = build_command(opcode, params);
    frame[0] = id.index();
    frame
}

/// Encode blink/breath timing as `[t_high BE, t_low BE]` parameters, where
/// `t_high = t_on + t_off` and `t_low = t_on`.
///
/// Periods that do not fit 16 bits are rejected instead of wrapping.
pub fn timing_params(t_on: u16, t_off: u16) -> Result<CommandParams> {
    let t_high = t_on.checked_add(t_off).ok_or(Error::InvalidTiming)?;
    let [hh, hl] = t_high.to_be_bytes();
    let [lh, ll] = t_on.to_be_bytes();
    Ok([Some(hh), Some(hl), Some(lh), Some(ll)])
}

// ── Status frames ─────────────────────────────────────────────

/// Operating mode reported in a status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    On,
    Blink,
    Breath,
}

impl TryFrom<u8> for LedMode {
    type Error = ProtocolError;

    fn try_from(raw: u8) -> core::result::Result<Self, ProtocolError> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            2 => Ok(Self::Blink),
            3 => Ok(Self::Breath),
            other => Err(ProtocolError::UnknownMode(other)),
        }
    }
}

/// A fully validated status read.  Only produced from a frame that passed
/// length, checksum and mode checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedStatus {
    pub mode: LedMode,
    pub brightness: u8,
    pub color: RgbColor,
    /// On-time in ms (`t_low`).
    pub t_on: u16,
    /// Off-time in ms (`t_high - t_low`, wrapping if the chip reports
    /// `t_high < t_low`).
    pub t_off: u16,
}

/// Decode and validate an 11-byte status frame.
pub fn decode_status(raw: &[u8]) -> Result<LedStatus> {
    if raw.len() != STATUS_FRAME_LEN {
        return Err(ProtocolError::BadLength {
            expected: STATUS_FRAME_LEN,
            got: raw.len(),
        }
        .into());
    }
    if !verify_checksum(raw) {
        return Err(Error::Checksum);
    }

    let mode = LedMode::try_from(raw[0])?;
    let t_high = u16::from_be_bytes([raw[5], raw[6]]);
    let t_low = u16::from_be_bytes([raw[7], raw[8]]);
    if t_high < t_low {
        debug!("status frame reports t_high {} < t_low {}", t_high, t_low);
    }

    Ok(LedStatus {
        mode,
        brightness: raw[1],
        color: RgbColor::new(raw[2], raw[3], raw[4]),
        t_on: t_low,
        t_off: t_high.wrapping_sub(t_low),
    })
}
