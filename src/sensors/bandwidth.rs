//! Network bandwidth sampler.
//!
//! Turns successive free-running byte-counter readings into throughput and
//! link utilisation.  Counters are 64-bit and may wrap; the delta is
//! computed wraparound-safe.
//!
//! Each computed reading replaces the baseline, so consecutive calls always
//! measure against the immediately preceding sample.  A call that arrives
//! too soon after the baseline is rejected and leaves the baseline alone.

use core::num::NonZeroU32;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::Serialize;

use crate::app::ports::CounterSource;
use crate::error::SamplingError;

/// Shortest interval that yields a meaningful rate.
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// One timestamped read of an interface's byte counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub timestamp: Instant,
}

/// Throughput derived from two counter samples.
///
/// Only constructed for valid intervals, so anything holding one may feed
/// it straight to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandwidthReading {
    pub rx_mbps: f64,
    pub tx_mbps: f64,
    pub total_mbps: f64,
    /// Share of link capacity in use, clamped to 100.
    pub usage_percentage: f64,
}

/// Byte delta between two readings of a free-running 64-bit counter.
pub fn counter_delta(previous: u64, current: u64) -> u64 {
    if current >= previous {
        current - previous
    } else {
        (u64::MAX - previous) + current
    }
}

/// Megabits per second for `bytes` transferred over `seconds`.
fn to_mbps(bytes: u64, seconds: f64) -> f64 {
    (bytes as f64 * 8.0) / (seconds * 1_000_000.0)
}

/// Compute a reading from a baseline and a newer sample.
pub fn compute_reading(
    previous: &CounterSample,
    current: &CounterSample,
    capacity_mbps: NonZeroU32,
) -> Result<BandwidthReading, SamplingError> {
    let elapsed = current.timestamp.saturating_duration_since(previous.timestamp);
    if elapsed < MIN_SAMPLE_INTERVAL {
        return Err(SamplingError::IntervalTooShort {
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    let seconds = elapsed.as_secs_f64();
    let rx_mbps = to_mbps(counter_delta(previous.rx_bytes, current.rx_bytes), seconds);
    let tx_mbps = to_mbps(counter_delta(previous.tx_bytes, current.tx_bytes), seconds);
    let total_mbps = rx_mbps + tx_mbps;
    let usage_percentage = (total_mbps / f64::from(capacity_mbps.get()) * 100.0).min(100.0);

    Ok(BandwidthReading {
        rx_mbps,
        tx_mbps,
        total_mbps,
        usage_percentage,
    })
}

/// Stateful sampler bound to one interface.
pub struct BandwidthSampler<S> {
    source: S,
    capacity_mbps: NonZeroU32,
    baseline: Option<CounterSample>,
}

impl<S: CounterSource> BandwidthSampler<S> {
    pub fn new(source: S, capacity_mbps: NonZeroU32) -> Self {
        Self {
            source,
            capacity_mbps,
            baseline: None,
        }
    }

    pub fn interface(&self) -> &str {
        self.source.interface()
    }

    pub fn capacity_mbps(&self) -> NonZeroU32 {
        self.capacity_mbps
    }

    /// Check the interface exists and take the first baseline sample.
    pub fn initialize(&mut self) -> Result<(), SamplingError> {
        if !self.source.interface_exists() {
            error!("Network interface {} does not exist", self.source.interface());
            return Err(SamplingError::InterfaceMissing);
        }

        let sample = self.source.read_counters().inspect_err(|_| {
            error!("Failed to read initial stats for interface {}", self.source.interface());
        })?;
        info!(
            "Bandwidth sampler initialized for {} (capacity: {} Mbps, initial: RX={}, TX={})",
            self.source.interface(),
            self.capacity_mbps,
            sample.rx_bytes,
            sample.tx_bytes
        );
        self.baseline = Some(sample);
        Ok(())
    }

    /// Read the counters and compute throughput since the baseline.
    pub fn sample(&mut self) -> Result<BandwidthReading, SamplingError> {
        let baseline = self.baseline.ok_or(SamplingError::NotInitialized)?;
        let current = self.source.read_counters()?;

        let reading = compute_reading(&baseline, &current, self.capacity_mbps)?;
        self.baseline = Some(current);

        debug!(
            "Bandwidth: RX={:.1} Mbps, TX={:.1} Mbps, Total={:.1} Mbps ({:.1}%)",
            reading.rx_mbps, reading.tx_mbps, reading.total_mbps, reading.usage_percentage
        );
        Ok(reading)
    }
}
