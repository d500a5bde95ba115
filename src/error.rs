//! Unified error types for the LED daemon.
//!
//! A single `Error` enum that every layer converts into, so the poll loop
//! handles failures uniformly.  All variants are `Copy`; nothing on the bus
//! path allocates to report a failure.

use core::fmt;

use crate::protocol::LedId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bus open/read/write failed, including short reads.
    Transport(TransportError),
    /// A status frame failed checksum validation (or summed to zero).
    Checksum,
    /// A frame decoded to a value the protocol does not define.
    Protocol(ProtocolError),
    /// Network counters could not be turned into a bandwidth reading.
    Sampling(SamplingError),
    /// The write-ack register reported a failed write.
    AckMismatch { value: u8 },
    /// One or more LEDs failed within a multi-LED operation.
    LedsFailed(LedSet),
    /// Blink/breath timing does not fit the 16-bit period field.
    InvalidTiming,
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Checksum => write!(f, "frame checksum mismatch"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Sampling(e) => write!(f, "sampling: {e}"),
            Self::AckMismatch { value } => {
                write!(f, "device write-ack register reads {value}, expected 1")
            }
            Self::LedsFailed(set) => write!(f, "LED operation failed for {set}"),
            Self::InvalidTiming => write!(f, "t_on + t_off exceeds 65535 ms"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No bus adapter matching the LED chip was found.
    AdapterNotFound,
    /// The bus device node could not be opened.
    OpenFailed,
    /// The bus transaction itself failed (NACK, arbitration loss, EIO).
    Io,
    /// The device returned fewer bytes than requested.
    ShortRead { expected: usize, got: usize },
    /// Requested block exceeds the transport's fixed buffer.
    BlockTooLarge(usize),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdapterNotFound => write!(f, "no compatible bus adapter found"),
            Self::OpenFailed => write!(f, "bus device open failed"),
            Self::Io => write!(f, "bus I/O error"),
            Self::ShortRead { expected, got } => {
                write!(f, "short read: expected {expected} bytes, got {got}")
            }
            Self::BlockTooLarge(len) => write!(f, "block of {len} bytes exceeds transport buffer"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Status frame mode byte outside 0..=3.
    UnknownMode(u8),
    /// Frame length differs from the fixed protocol length.
    BadLength { expected: usize, got: usize },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMode(m) => write!(f, "unknown LED mode {m:#04x}"),
            Self::BadLength { expected, got } => {
                write!(f, "frame length {got}, expected {expected}")
            }
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Sampling errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingError {
    /// The network interface does not exist.
    InterfaceMissing,
    /// Neither counter source could be read or parsed.
    CountersUnavailable,
    /// `sample()` called before a baseline was taken.
    NotInitialized,
    /// Less than the minimum interval elapsed since the baseline.
    /// Expected under normal call timing; not a fault.
    IntervalTooShort { elapsed_ms: u64 },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterfaceMissing => write!(f, "network interface does not exist"),
            Self::CountersUnavailable => write!(f, "byte counters unavailable"),
            Self::NotInitialized => write!(f, "sampler has no baseline"),
            Self::IntervalTooShort { elapsed_ms } => {
                write!(f, "sample interval too short ({elapsed_ms} ms)")
            }
        }
    }
}

impl From<SamplingError> for Error {
    fn from(e: SamplingError) -> Self {
        Self::Sampling(e)
    }
}

// ---------------------------------------------------------------------------
// LED failure set
// ---------------------------------------------------------------------------

/// Bitmask of LEDs that failed in one multi-LED operation.
///
/// Failures are accumulated with bitwise OR so every LED in a sequence is
/// attempted and the caller still learns exactly which ones failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedSet(u16);

impl LedSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, id: LedId) {
        self.0 |= 1 << id.index();
    }

    pub const fn contains(self, id: LedId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = LedId> {
        LedId::ALL.into_iter().filter(move |id| self.contains(*id))
    }
}

impl core::ops::BitOr for LedSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for LedSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<LedId> for LedSet {
    fn from(id: LedId) -> Self {
        let mut set = Self::empty();
        set.insert(id);
        set
    }
}

impl fmt::Display for LedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
