//! Classifier and applier wired together behind one handle.

use embedded_hal::delay::DelayNs;
use log::info;

use super::{StateApplier, VisualState, classify};
use crate::app::ports::LedPort;
use crate::config::ThresholdSet;
use crate::error::Result;
use crate::sensors::bandwidth::BandwidthReading;

pub struct LedStateManager<D> {
    thresholds: ThresholdSet,
    applier: StateApplier<D>,
}

impl<D: DelayNs> LedStateManager<D> {
    pub fn new(thresholds: ThresholdSet, brightness: u8, delay: D) -> Self {
        Self {
            thresholds,
            applier: StateApplier::new(brightness, delay),
        }
    }

    pub fn current_state(&self) -> VisualState {
        self.applier.current_state()
    }

    pub fn target_for(&self, reading: &BandwidthReading) -> VisualState {
        classify(reading.usage_percentage, &self.thresholds)
    }

    /// Classify `reading` and move the LEDs to the matching state.
    ///
    /// Returns the state the reading classified to, whether or not it was
    /// already shown.
    pub fn update(
        &mut self,
        reading: &BandwidthReading,
        leds: &mut impl LedPort,
    ) -> Result<VisualState> {
        let target = self.target_for(reading);
        let previous = self.applier.current_state();
        self.applier.apply(target, leds)?;
        if target != previous {
            info!(
                "LED state change: {} -> {} (usage {:.1}%)",
                previous, target, reading.usage_percentage
            );
        }
        Ok(target)
    }

    /// Write `state` to the LEDs regardless of what is recorded.
    pub fn set_state(&mut self, state: VisualState, leds: &mut impl LedPort) -> Result<()> {
        self.applier.apply_forced(state, leds)
    }
}
