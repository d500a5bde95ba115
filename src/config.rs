//! Service configuration parameters
//!
//! All tunable parameters for the LED daemon.  Values come from an INI file
//! (see [`crate::adapters::config_file`]) layered over these defaults.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Utilisation band boundaries in percent.
///
/// The classifier expects `low <= medium <= high`; [`ThresholdSet::new`]
/// and [`ServiceConfig::validate`] enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl ThresholdSet {
    pub fn new(low: u8, medium: u8, high: u8) -> Result<Self, ConfigError> {
        let set = Self { low, medium, high };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.high > 100 {
            return Err(ConfigError::ValidationFailed("thresholds must be 0–100"));
        }
        if self.low > self.medium || self.medium > self.high {
            return Err(ConfigError::ValidationFailed(
                "thresholds must satisfy low <= medium <= high",
            ));
        }
        Ok(())
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            low: 10,
            medium: 40,
            high: 80,
        }
    }
}

/// Core service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    // --- Network ---
    /// Interface whose counters are sampled
    pub interface: String,
    /// Link capacity in Mbps (both directions combined)
    pub capacity_mbps: u32,

    // --- LEDs ---
    /// LED brightness (0-255)
    pub brightness: u8,
    pub thresholds: ThresholdSet,

    // --- Logging ---
    /// One of debug, info, warning, error
    pub log_level: String,

    // --- Timing ---
    /// Poll period (milliseconds)
    pub poll_interval_ms: u32,
    /// Consecutive invalid samples before the service gives up
    pub max_consecutive_failures: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            interface: "eth0".to_owned(),
            capacity_mbps: 2000, // 1 Gbps full duplex
            brightness: 255,
            thresholds: ThresholdSet::default(),
            log_level: "info".to_owned(),
            poll_interval_ms: 1000,
            max_consecutive_failures: 10,
        }
    }
}

impl ServiceConfig {
    /// Reject combinations the core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interface.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("interface must not be empty"));
        }
        if self.capacity_mbps == 0 {
            return Err(ConfigError::ValidationFailed("capacity_mbps must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_consecutive_failures must be > 0",
            ));
        }
        self.thresholds.validate()
    }

    /// Link capacity as a non-zero divisor.
    pub fn capacity(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.capacity_mbps)
            .ok_or(ConfigError::ValidationFailed("capacity_mbps must be > 0"))
    }

    /// `log` filter for the configured level name.
    pub fn log_filter(&self) -> log::LevelFilter {
        match self.log_level.as_str() {
            "debug" => log::LevelFilter::Debug,
            "warning" | "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
