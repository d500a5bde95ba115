//! Front-panel LED controller driver.
//!
//! Builds per-LED operations (on/off, colour, brightness, blink, breathe,
//! status read) out of [`BusTransport`] transactions and the frame codec.
//!
//! The chip firmware needs settle time between successive register writes.
//! The dwell delays below are part of the protocol; in `turn_off_all` they
//! are honoured even after an earlier LED failed.

use embedded_hal::delay::DelayNs;
use log::{error, warn};

use crate::app::ports::{BusTransport, LedPort};
use crate::error::{Error, LedSet, Result, TransportError};
use crate::protocol::frame::{self, CommandParams, LedStatus, STATUS_FRAME_LEN};
use crate::protocol::{LedId, Opcode, RgbColor, WRITE_ACK_REG};

/// Dwell between colour, brightness and on-off writes to one LED.
pub const LATCH_DWELL_MS: u32 = 10;

/// Dwell between LEDs when switching everything off.
pub const OFF_ALL_DWELL_MS: u32 = 20;

/// Settle time before reading the write-ack register.
pub const ACK_SETTLE_MS: u32 = 50;

/// LEDs cleared by [`LedController::turn_off_all`], in order.
pub const PANEL_LEDS: [LedId; 4] = [LedId::Power, LedId::Netdev, LedId::Disk1, LedId::Disk2];

pub struct LedController<T, D> {
    bus: T,
    delay: D,
}

impl<T: BusTransport, D: DelayNs> LedController<T, D> {
    pub fn new(bus: T, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Release the bus and delay provider.
    pub fn into_parts(self) -> (T, D) {
        (self.bus, self.delay)
    }

    // ── Raw commands ──────────────────────────────────────────

    pub fn set_onoff(&mut self, id: LedId, on: bool) -> Result<()> {
        self.send(id, Opcode::OnOff, [Some(u8::from(on)), None, None, None])
    }

    pub fn set_rgb(&mut self, id: LedId, color: RgbColor) -> Result<()> {
        self.send(id, Opcode::Rgb, [Some(color.r), Some(color.g), Some(color.b), None])
    }

    pub fn set_brightness(&mut self, id: LedId, brightness: u8) -> Result<()> {
        self.send(id, Opcode::Brightness, [Some(brightness), None, None, None])
    }

    /// Blink with `t_on` ms lit and `t_off` ms dark.
    pub fn set_blink(&mut self, id: LedId, t_on: u16, t_off: u16) -> Result<()> {
        let params = frame::timing_params(t_on, t_off)?;
        self.send(id, Opcode::Blink, params)
    }

    /// Breathe with `t_on` ms ramp and `t_off` ms dark.
    pub fn set_breath(&mut self, id: LedId, t_on: u16, t_off: u16) -> Result<()> {
        let params = frame::timing_params(t_on, t_off)?;
        self.send(id, Opcode::Breath, params)
    }

    /// Read the chip's "last write succeeded" register.
    ///
    /// Writes that the bus accepted can still be dropped by the chip; this is
    /// the only way to find out.
    pub fn check_write_ack(&mut self) -> Result<()> {
        match self.bus.read_byte(WRITE_ACK_REG)? {
            1 => Ok(()),
            value => Err(Error::AckMismatch { value }),
        }
    }

    fn send(&mut self, id: LedId, opcode: Opcode, params: CommandParams) -> Result<()> {
        let frame = frame::command_for(id, opcode, params);
        self.bus.write_block(id.command_reg(), &frame)?;
        Ok(())
    }
}

impl<T: BusTransport, D: DelayNs> LedPort for LedController<T, D> {
    /// Colour → dwell → brightness → dwell → on.  Stops at the first failure.
    fn set_led_state(&mut self, id: LedId, on: bool, color: RgbColor, brightness: u8) -> Result<()> {
        if !on {
            return self.turn_off(id);
        }

        self.set_rgb(id, color).inspect_err(|e| {
            error!("Failed to set RGB for LED {}: {}", id, e);
        })?;
        self.delay.delay_ms(LATCH_DWELL_MS);

        self.set_brightness(id, brightness).inspect_err(|e| {
            error!("Failed to set brightness for LED {}: {}", id, e);
        })?;
        self.delay.delay_ms(LATCH_DWELL_MS);

        self.set_onoff(id, true).inspect_err(|e| {
            error!("Failed to turn on LED {}: {}", id, e);
        })
    }

    fn turn_off(&mut self, id: LedId) -> Result<()> {
        self.set_onoff(id, false)
    }

    fn turn_off_all(&mut self) -> Result<()> {
        let mut failed = LedSet::empty();

        for (i, id) in PANEL_LEDS.into_iter().enumerate() {
            if i > 0 {
                self.delay.delay_ms(OFF_ALL_DWELL_MS);
            }
            if let Err(e) = self.turn_off(id) {
                error!("Failed to turn off {} LED: {}", id, e);
                failed.insert(id);
            }
        }

        if !failed.is_empty() {
            return Err(Error::LedsFailed(failed));
        }

        self.delay.delay_ms(ACK_SETTLE_MS);
        self.check_write_ack().inspect_err(|e| {
            warn!("LED controller reports last modification was not successful: {}", e);
        })
    }

    fn get_status(&mut self, id: LedId) -> Result<LedStatus> {
        let raw = self.bus.read_block(id.status_reg(), STATUS_FRAME_LEN)?;
        if raw.len() != STATUS_FRAME_LEN {
            return Err(TransportError::ShortRead {
                expected: STATUS_FRAME_LEN,
                got: raw.len(),
            }
            .into());
        }
        frame::decode_status(&raw)
    }
}
