//! LED chip bus protocol: register map, identifiers and frame codec.
//!
//! ```text
//!   0x00 + idx  ── command register (12-byte command frame, write)
//!   0x80        ── write-ack register (1 byte, read; 1 = last write OK)
//!   0x81 + idx  ── status register   (11-byte status frame, read)
//! ```
//!
//! The chip answers at 7-bit bus address [`LED_CHIP_ADDR`].

pub mod frame;

use core::fmt;

use serde::{Deserialize, Serialize};

/// 7-bit bus address of the LED controller chip.
pub const LED_CHIP_ADDR: u8 = 0x3a;

/// Register holding the "last write succeeded" flag.
pub const WRITE_ACK_REG: u8 = 0x80;

/// Base of the per-LED status registers.
pub const STATUS_REG_BASE: u8 = 0x81;

// ── LED identifiers ───────────────────────────────────────────

/// Front-panel LED, tagged by its register offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedId {
    Power = 0,
    Netdev = 1,
    Disk1 = 2,
    Disk2 = 3,
    Disk3 = 4,
    Disk4 = 5,
    Disk5 = 6,
    Disk6 = 7,
    Disk7 = 8,
    Disk8 = 9,
}

impl LedId {
    pub const ALL: [Self; 10] = [
        Self::Power,
        Self::Netdev,
        Self::Disk1,
        Self::Disk2,
        Self::Disk3,
        Self::Disk4,
        Self::Disk5,
        Self::Disk6,
        Self::Disk7,
        Self::Disk8,
    ];

    /// Register offset of this LED.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Register a command frame for this LED is written to.
    pub const fn command_reg(self) -> u8 {
        self.index()
    }

    /// Register the status frame for this LED is read from.
    pub const fn status_reg(self) -> u8 {
        STATUS_REG_BASE + self.index()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Netdev => "netdev",
            Self::Disk1 => "disk1",
            Self::Disk2 => "disk2",
            Self::Disk3 => "disk3",
            Self::Disk4 => "disk4",
            Self::Disk5 => "disk5",
            Self::Disk6 => "disk6",
            Self::Disk7 => "disk7",
            Self::Disk8 => "disk8",
        }
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Colour ────────────────────────────────────────────────────

/// 8-bit-per-channel colour as understood by the chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

pub const COLOR_WHITE: RgbColor = RgbColor::new(255, 255, 255);
pub const COLOR_GREEN: RgbColor = RgbColor::new(0, 255, 0);
pub const COLOR_BLUE: RgbColor = RgbColor::new(0, 0, 255);
pub const COLOR_RED: RgbColor = RgbColor::new(255, 0, 0);
pub const COLOR_OFF: RgbColor = RgbColor::new(0, 0, 0);

// ── Opcodes ───────────────────────────────────────────────────

/// Command opcode carried in byte 5 of a command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Brightness = 0x01,
    Rgb = 0x02,
    OnOff = 0x03,
    Blink = 0x04,
    Breath = 0x05,
}

impl Opcode {
    pub const fn code(self) -> u8 {
        self as u8
    }
}
