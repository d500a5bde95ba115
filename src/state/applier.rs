//! Drives the panel LEDs to a target [`VisualState`].
//!
//! The recorded state only moves on a fully successful apply.  After a
//! partial failure the physical LEDs may already show part of the new
//! state, so the applier marks itself out of sync and the next apply
//! rewrites every LED even if the target equals the recorded state.

use embedded_hal::delay::DelayNs;
use log::{debug, error};

use super::VisualState;
use crate::app::ports::LedPort;
use crate::error::{Error, LedSet, Result};
use crate::protocol::{COLOR_WHITE, LedId};

/// Dwell between LEDs within one apply.
pub const INTER_LED_DWELL_MS: u32 = 100;

pub struct StateApplier<D> {
    delay: D,
    brightness: u8,
    current: VisualState,
    out_of_sync: bool,
}

impl<D: DelayNs> StateApplier<D> {
    pub fn new(brightness: u8, delay: D) -> Self {
        Self {
            delay,
            brightness,
            current: VisualState::Off,
            out_of_sync: false,
        }
    }

    /// Last state that was applied without error.
    pub fn current_state(&self) -> VisualState {
        self.current
    }

    /// Whether the LEDs may not match [`current_state`](Self::current_state).
    pub fn is_out_of_sync(&self) -> bool {
        self.out_of_sync
    }

    /// Apply `target`, skipping all bus traffic when it is already shown.
    pub fn apply(&mut self, target: VisualState, leds: &mut impl LedPort) -> Result<()> {
        if target == self.current && !self.out_of_sync {
            return Ok(());
        }
        self.write_state(target, leds)
    }

    /// Apply `target` unconditionally.
    pub fn apply_forced(&mut self, target: VisualState, leds: &mut impl LedPort) -> Result<()> {
        self.write_state(target, leds)
    }

    fn write_state(&mut self, target: VisualState, leds: &mut impl LedPort) -> Result<()> {
        let t = target.targets();
        debug!(
            "Applying LED state {}: netdev={}, disk1={}, disk2={}, color={}",
            target,
            on_off(t.netdev_on),
            on_off(t.disk1_on),
            on_off(t.disk2_on),
            t.color
        );

        if let Err(e) = leds.set_led_state(LedId::Power, true, COLOR_WHITE, self.brightness) {
            error!("Failed to set power LED: {}", e);
            self.out_of_sync = true;
            return Err(Error::LedsFailed(LedId::Power.into()));
        }
        self.delay.delay_ms(INTER_LED_DWELL_MS);

        let steps = [
            (LedId::Netdev, t.netdev_on),
            (LedId::Disk1, t.disk1_on),
            (LedId::Disk2, t.disk2_on),
        ];
        let mut failed = LedSet::empty();
        for (i, (id, on)) in steps.into_iter().enumerate() {
            if i > 0 {
                self.delay.delay_ms(INTER_LED_DWELL_MS);
            }
            let result = if on {
                leds.set_led_state(id, true, t.color, self.brightness)
            } else {
                leds.turn_off(id)
            };
            if let Err(e) = result {
                error!("Failed to turn {} {} LED: {}", on_off(on), id, e);
                failed.insert(id);
            }
        }

        if !failed.is_empty() {
            error!("Failed to apply LED state {} ({} failed)", target, failed);
            self.out_of_sync = true;
            return Err(Error::LedsFailed(failed));
        }

        debug!("Successfully applied LED state {}", target);
        self.current = target;
        self.out_of_sync = false;
        Ok(())
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
