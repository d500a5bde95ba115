//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LedController / Sampler / MonitorService
//! ```
//!
//! Driven adapters (bus, counters, config file, event sinks) implement these
//! traits.  The core consumes them via generics, so nothing above the
//! adapters touches `/dev` or `/sys` directly.

use std::path::PathBuf;

use heapless::Vec;

use crate::config::ServiceConfig;
use crate::error::{Result, SamplingError, TransportError};
use crate::protocol::frame::LedStatus;
use crate::protocol::{LedId, RgbColor};
use crate::sensors::bandwidth::CounterSample;

/// Largest block a single bus transaction may carry (SMBus limit).
pub const MAX_BLOCK_LEN: usize = 32;

/// Bytes returned by one block read.
pub type Block = Vec<u8, MAX_BLOCK_LEN>;

// ───────────────────────────────────────────────────────────────
// Bus transport (driven adapter: domain ↔ LED chip)
// ───────────────────────────────────────────────────────────────

/// Register-addressed bus bound to one device.
///
/// Each call is exactly one blocking bus transaction with no retry.
pub trait BusTransport {
    /// Write `data` to register `reg`.
    fn write_block(&mut self, reg: u8, data: &[u8]) -> core::result::Result<(), TransportError>;

    /// Read `len` bytes starting at register `reg`.
    ///
    /// Returns [`TransportError::ShortRead`] if the device delivers fewer.
    fn read_block(&mut self, reg: u8, len: usize) -> core::result::Result<Block, TransportError>;

    /// Read a single byte from register `reg`.
    fn read_byte(&mut self, reg: u8) -> core::result::Result<u8, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// LED port (domain → LED controller)
// ───────────────────────────────────────────────────────────────

/// Per-LED operations the state applier drives.
pub trait LedPort {
    /// Turn `id` on with `color` and `brightness`, or off when `on` is false.
    fn set_led_state(&mut self, id: LedId, on: bool, color: RgbColor, brightness: u8)
    -> Result<()>;

    /// Turn `id` off.
    fn turn_off(&mut self, id: LedId) -> Result<()>;

    /// Turn off power, netdev, disk1 and disk2, then verify the write-ack.
    fn turn_off_all(&mut self) -> Result<()>;

    /// Read back the chip's view of `id`.
    fn get_status(&mut self, id: LedId) -> Result<LedStatus>;
}

// ───────────────────────────────────────────────────────────────
// Counter source (driven adapter: host network stack → sampler)
// ───────────────────────────────────────────────────────────────

/// Free-running byte counters for one network interface.
pub trait CounterSource {
    /// Name of the interface being read.
    fn interface(&self) -> &str;

    /// Whether the interface currently exists on the host.
    fn interface_exists(&self) -> bool;

    /// Take one timestamped counter reading.
    fn read_counters(&mut self) -> core::result::Result<CounterSample, SamplingError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads service configuration.
///
/// Implementations return a config that has passed
/// [`ServiceConfig::validate`].
pub trait ConfigPort {
    fn load(&self) -> core::result::Result<ServiceConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Bus locator
// ───────────────────────────────────────────────────────────────

/// Finds the bus device node the LED chip sits on.
pub trait BusLocator {
    fn locate(&self) -> core::result::Result<PathBuf, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not well-formed.
    Parse(String),
    /// A config field failed validation.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
