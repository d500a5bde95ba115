//! Mock adapters for integration tests.
//!
//! Records every bus write, LED call, delay and event so tests can assert
//! on the full history without touching `/dev/i2c-*` or `/sys`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use ethutild::app::events::AppEvent;
use ethutild::app::ports::{Block, BusTransport, CounterSource, EventSink, LedPort};
use ethutild::app::service::CancelToken;
use ethutild::error::{Error, LedSet, Result, SamplingError, TransportError};
use ethutild::protocol::frame::LedStatus;
use ethutild::protocol::{LedId, RgbColor, WRITE_ACK_REG};
use ethutild::sensors::bandwidth::CounterSample;

// ── Simulated LED chip (BusTransport) ─────────────────────────

/// Accepts every write, optionally failing chosen registers.
pub struct MockChip {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail_regs: Vec<u8>,
    pub status: HashMap<u8, Vec<u8>>,
    pub ack: u8,
}

impl MockChip {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            fail_regs: Vec::new(),
            status: HashMap::new(),
            ack: 1,
        }
    }

    /// Opcode byte of every command frame written, with its register.
    pub fn ops(&self) -> Vec<(u8, u8)> {
        self.writes.iter().map(|(reg, f)| (*reg, f[5])).collect()
    }
}

impl Default for MockChip {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransport for MockChip {
    fn write_block(&mut self, reg: u8, data: &[u8]) -> core::result::Result<(), TransportError> {
        self.writes.push((reg, data.to_vec()));
        if self.fail_regs.contains(&reg) {
            return Err(TransportError::Io);
        }
        Ok(())
    }

    fn read_block(&mut self, reg: u8, len: usize) -> core::result::Result<Block, TransportError> {
        let data = self.status.get(&reg).ok_or(TransportError::Io)?;
        let n = data.len().min(len);
        Block::from_slice(&data[..n]).map_err(|_| TransportError::BlockTooLarge(n))
    }

    fn read_byte(&mut self, reg: u8) -> core::result::Result<u8, TransportError> {
        if reg == WRITE_ACK_REG {
            Ok(self.ack)
        } else {
            Err(TransportError::Io)
        }
    }
}

// ── Recording LED port ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedCall {
    On(LedId, RgbColor),
    Off(LedId),
    AllOff,
}

pub struct MockLeds {
    pub calls: Vec<LedCall>,
    pub failing: LedSet,
}

impl MockLeds {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            failing: LedSet::empty(),
        }
    }

    pub fn failing(id: LedId) -> Self {
        Self {
            calls: Vec::new(),
            failing: id.into(),
        }
    }

    fn outcome(&self, id: LedId) -> Result<()> {
        if self.failing.contains(id) {
            Err(TransportError::Io.into())
        } else {
            Ok(())
        }
    }
}

impl Default for MockLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl LedPort for MockLeds {
    fn set_led_state(&mut self, id: LedId, on: bool, color: RgbColor, _brightness: u8) -> Result<()> {
        self.calls.push(if on { LedCall::On(id, color) } else { LedCall::Off(id) });
        self.outcome(id)
    }

    fn turn_off(&mut self, id: LedId) -> Result<()> {
        self.calls.push(LedCall::Off(id));
        self.outcome(id)
    }

    fn turn_off_all(&mut self) -> Result<()> {
        self.calls.push(LedCall::AllOff);
        Ok(())
    }

    fn get_status(&mut self, _id: LedId) -> Result<LedStatus> {
        Err(Error::Checksum)
    }
}

// ── Scripted network counters ─────────────────────────────────

pub struct ScriptedCounters {
    pub exists: bool,
    pub samples: VecDeque<core::result::Result<CounterSample, SamplingError>>,
}

impl ScriptedCounters {
    pub fn new(samples: Vec<core::result::Result<CounterSample, SamplingError>>) -> Self {
        Self {
            exists: true,
            samples: samples.into(),
        }
    }
}

impl CounterSource for ScriptedCounters {
    fn interface(&self) -> &str {
        "eth0"
    }

    fn interface_exists(&self) -> bool {
        self.exists
    }

    fn read_counters(&mut self) -> core::result::Result<CounterSample, SamplingError> {
        self.samples
            .pop_front()
            .unwrap_or(Err(SamplingError::CountersUnavailable))
    }
}

/// Counter reading `ms` after `base`.
pub fn sample_at(base: Instant, ms: u64, rx: u64, tx: u64) -> core::result::Result<CounterSample, SamplingError> {
    Ok(CounterSample {
        rx_bytes: rx,
        tx_bytes: tx,
        timestamp: base + Duration::from_millis(ms),
    })
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Delays ────────────────────────────────────────────────────

/// Delay that records into a log shared between clones, so the
/// controller's and the applier's dwells land in one timeline.
#[derive(Clone, Default)]
pub struct SharedDelay(pub Rc<RefCell<Vec<u32>>>);

impl SharedDelay {
    pub fn log(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayNs for SharedDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

/// Sleeper that cancels `token` on its `after`-th call.
pub struct CancelAfter {
    pub token: CancelToken,
    pub after: usize,
    pub calls: usize,
}

impl CancelAfter {
    pub fn new(token: CancelToken, after: usize) -> Self {
        Self {
            token,
            after,
            calls: 0,
        }
    }
}

impl DelayNs for CancelAfter {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, _ms: u32) {
        self.calls += 1;
        if self.calls >= self.after {
            self.token.cancel();
        }
    }
}
