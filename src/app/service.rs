//! Application service: the poll loop.
//!
//! [`MonitorService`] owns the bandwidth sampler and the LED state
//! manager.  All I/O flows through port traits injected at call sites,
//! making the entire loop testable with mock adapters.
//!
//! ```text
//!  CounterSource ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │      MonitorService      │
//!        LedPort ◀── │  Sampler · StateManager  │
//!                    └──────────────────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::sensors::bandwidth::{BandwidthReading, BandwidthSampler};
use crate::state::LedStateManager;

use super::events::AppEvent;
use super::ports::{CounterSource, EventSink, LedPort};

// ───────────────────────────────────────────────────────────────
// Cancellation
// ───────────────────────────────────────────────────────────────

/// Shared stop flag, set from a signal handler and polled between cycles.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService<S, D> {
    sampler: BandwidthSampler<S>,
    manager: LedStateManager<D>,
    poll_interval_ms: u32,
    max_consecutive_failures: u32,
    consecutive_failures: u32,
    cycles: u64,
}

impl<S: CounterSource, D: DelayNs> MonitorService<S, D> {
    pub fn new(
        sampler: BandwidthSampler<S>,
        manager: LedStateManager<D>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            sampler,
            manager,
            poll_interval_ms: config.poll_interval_ms,
            max_consecutive_failures: config.max_consecutive_failures,
            consecutive_failures: 0,
            cycles: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the sampler's baseline.  Fails if the interface is missing or
    /// its counters cannot be read.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.sampler.initialize()?;
        info!(
            "Monitoring interface: {} (capacity: {} Mbps)",
            self.sampler.interface(),
            self.sampler.capacity_mbps()
        );
        sink.emit(&AppEvent::Started {
            interface: self.sampler.interface().to_owned(),
            capacity_mbps: self.sampler.capacity_mbps().get(),
        });
        Ok(())
    }

    /// Poll until `cancel` is set or sampling fails too many times in a row.
    ///
    /// One poll period passes before the first sample so it measures a
    /// full interval.  Cancellation is only observed between cycles.
    pub fn run(
        &mut self,
        cancel: &CancelToken,
        leds: &mut impl LedPort,
        sink: &mut impl EventSink,
        sleeper: &mut impl DelayNs,
    ) -> Result<()> {
        sleeper.delay_ms(self.poll_interval_ms);

        let result = loop {
            if cancel.is_cancelled() {
                break Ok(());
            }
            if let Err(e) = self.tick(leds, sink) {
                break Err(e);
            }
            sleeper.delay_ms(self.poll_interval_ms);
        };

        sink.emit(&AppEvent::Stopped {
            cycles: self.cycles,
        });
        result
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// One cycle: sample → classify → apply.
    ///
    /// LED failures are reported and swallowed.  Only a run of
    /// `max_consecutive_failures` invalid samples is an error.
    pub fn tick(&mut self, leds: &mut impl LedPort, sink: &mut impl EventSink) -> Result<()> {
        self.cycles += 1;

        let reading = match self.sampler.sample() {
            Ok(reading) => reading,
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    "Invalid bandwidth measurement: {} (failure {}/{})",
                    e, self.consecutive_failures, self.max_consecutive_failures
                );
                sink.emit(&AppEvent::SampleRejected {
                    error: e,
                    consecutive: self.consecutive_failures,
                    max: self.max_consecutive_failures,
                });
                if self.consecutive_failures >= self.max_consecutive_failures {
                    error!("Too many consecutive bandwidth measurement failures, exiting");
                    return Err(e.into());
                }
                return Ok(());
            }
        };

        self.consecutive_failures = 0;
        sink.emit(&AppEvent::Telemetry(reading));

        let previous = self.manager.current_state();
        match self.manager.update(&reading, leds) {
            Ok(state) if state != previous => sink.emit(&AppEvent::StateChanged {
                from: previous,
                to: state,
            }),
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to update LEDs: {}", e);
                sink.emit(&AppEvent::ApplyFailed {
                    target: self.manager.target_for(&reading),
                    error: e,
                });
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn manager(&self) -> &LedStateManager<D> {
        &self.manager
    }
}

// ───────────────────────────────────────────────────────────────
// Demo mode
// ───────────────────────────────────────────────────────────────

/// Usages cycled by [`run_demo`], with what each should look like.
pub const DEMO_STEPS: [(f64, &str); 4] = [
    (5.0, "5% usage - Power white, utilization LEDs off"),
    (25.0, "25% usage - Power white, NetDev green"),
    (60.0, "60% usage - Power white, NetDev + Disk1 blue"),
    (90.0, "90% usage - Power white, NetDev + Disk1 + Disk2 red"),
];

/// Synthetic reading for a demo step.
pub fn demo_reading(usage_percentage: f64) -> BandwidthReading {
    BandwidthReading {
        rx_mbps: usage_percentage * 10.0,
        tx_mbps: usage_percentage * 10.0,
        total_mbps: usage_percentage * 20.0,
        usage_percentage,
    }
}

/// Cycle the LEDs through every visual state, one step per `period_ms`,
/// until `cancel` is set.  The first apply failure ends the demo.
pub fn run_demo<D: DelayNs>(
    cancel: &CancelToken,
    manager: &mut LedStateManager<D>,
    leds: &mut impl LedPort,
    sleeper: &mut impl DelayNs,
    period_ms: u32,
) -> Result<()> {
    info!("Starting testing mode - cycling through bandwidth states");
    for (usage, description) in DEMO_STEPS.iter().cycle() {
        if cancel.is_cancelled() {
            break;
        }
        info!("Testing: {}", description);
        manager.update(&demo_reading(*usage), leds).inspect_err(|e| {
            error!("Failed to update LEDs in testing mode: {}", e);
        })?;
        sleeper.delay_ms(period_ms);
    }
    info!("Testing mode completed");
    Ok(())
}

/// Switch every panel LED off before exit.  Failure is logged only.
pub fn shutdown(leds: &mut impl LedPort) {
    info!("Turning off all LEDs before shutdown");
    if let Err(e) = leds.turn_off_all() {
        warn!("Failed to turn off all LEDs: {}", e);
    }
}
