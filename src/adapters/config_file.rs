//! INI configuration file adapter.
//!
//! Implements [`ConfigPort`] by layering an INI file over
//! [`ServiceConfig::default`].  The file is looked up at an explicit path
//! if one was given, otherwise at `./ethutild.conf` then
//! `/etc/ethutild.conf`.  With no file at all the defaults are used.
//!
//! ```ini
//! [network]
//! interface = eth0
//! capacity_mbps = 2000
//!
//! [leds]
//! brightness = 255
//! low_threshold = 10
//! medium_threshold = 40
//! high_threshold = 80
//!
//! [logging]
//! level = info
//! ```
//!
//! The file is read with the `config` crate's INI format into a
//! [`RawConfig`] of optional strings.  A value that does not parse or is
//! out of range is logged and the default kept; only the combined result
//! goes through [`ServiceConfig::validate`].

use std::fs;
use std::path::{Path, PathBuf};

use ::config::{Config, File, FileFormat};
use log::{info, warn};
use serde::Deserialize;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ServiceConfig;

pub const LOCAL_CONFIG_PATH: &str = "./ethutild.conf";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ethutild.conf";

pub const EXAMPLE_CONFIG: &str = "\
# ethutild configuration

[network]
# Interface to monitor
interface = eth0
# Link capacity in Mbps, both directions combined (1 Gbps full duplex = 2000)
capacity_mbps = 2000

[leds]
# LED brightness (0-255)
brightness = 255
# Utilisation thresholds in percent
low_threshold = 10
medium_threshold = 40
high_threshold = 80

[logging]
# debug, info, warning or error
level = info
";

pub struct IniConfigFile {
    explicit: Option<PathBuf>,
    search: Vec<PathBuf>,
}

impl IniConfigFile {
    /// Look in the default locations.
    pub fn new() -> Self {
        Self {
            explicit: None,
            search: vec![LOCAL_CONFIG_PATH.into(), SYSTEM_CONFIG_PATH.into()],
        }
    }

    /// Read exactly `path`; a missing file is an error.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            search: Vec::new(),
        }
    }

    fn load_from(&self, path: &Path) -> Result<ServiceConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        let raw = parse_raw(&text)?;
        let mut config = ServiceConfig::default();
        apply_raw(&mut config, &raw);
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

impl Default for IniConfigFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for IniConfigFile {
    fn load(&self) -> Result<ServiceConfig, ConfigError> {
        let config = if let Some(path) = &self.explicit {
            self.load_from(path)?
        } else {
            self.search
                .iter()
                .filter(|path| path.exists())
                .find_map(|path| {
                    self.load_from(path)
                        .inspect_err(|e| {
                            warn!("Failed to parse configuration file {}: {}", path.display(), e)
                        })
                        .ok()
                })
                .unwrap_or_else(|| {
                    info!("No configuration file found, using defaults");
                    ServiceConfig::default()
                })
        };
        config.validate()?;
        Ok(config)
    }
}

/// Write [`EXAMPLE_CONFIG`] to `path`.
pub fn write_example(path: &Path) -> Result<(), ConfigError> {
    fs::write(path, EXAMPLE_CONFIG)?;
    Ok(())
}

// ── Raw file shape ────────────────────────────────────────────

/// The file as written: every field optional and still a string, so one
/// bad value can be reported without rejecting the rest.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub network: RawNetwork,
    pub leds: RawLeds,
    pub logging: RawLogging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNetwork {
    pub interface: Option<String>,
    pub capacity_mbps: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLeds {
    pub brightness: Option<String>,
    pub low_threshold: Option<String>,
    pub medium_threshold: Option<String>,
    pub high_threshold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLogging {
    pub level: Option<String>,
}

/// Deserialize INI `text` into a [`RawConfig`].
pub fn parse_raw(text: &str) -> Result<RawConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(text, FileFormat::Ini))
        .build()
        .and_then(|c| c.try_deserialize::<RawConfig>())
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Overlay the values present in `raw` onto `config`.
pub fn apply_raw(config: &mut ServiceConfig, raw: &RawConfig) {
    if let Some(interface) = present(raw.network.interface.as_ref()) {
        config.interface = interface.to_owned();
    }
    if let Some(v) = present(raw.network.capacity_mbps.as_ref()) {
        match v.parse::<u32>() {
            Ok(capacity) => config.capacity_mbps = capacity,
            Err(_) => warn!("Invalid capacity_mbps value: {}, using default", v),
        }
    }

    let leds = &raw.leds;
    let overlay = [
        (&leds.brightness, "brightness", 255, &mut config.brightness),
        (&leds.low_threshold, "low_threshold", 100, &mut config.thresholds.low),
        (&leds.medium_threshold, "medium_threshold", 100, &mut config.thresholds.medium),
        (&leds.high_threshold, "high_threshold", 100, &mut config.thresholds.high),
    ];
    for (value, name, max, field) in overlay {
        if let Some(n) = present(value.as_ref()).and_then(|v| ranged(v, name, max)) {
            *field = n;
        }
    }

    if let Some(level) = present(raw.logging.level.as_ref()) {
        config.log_level = level.to_owned();
    }
}

/// Parse `value` as an integer in `0..=max`, warning otherwise.
fn ranged(value: &str, name: &str, max: u8) -> Option<u8> {
    match value.parse::<i64>() {
        Ok(n) if (0..=i64::from(max)).contains(&n) => u8::try_from(n).ok(),
        Ok(n) => {
            warn!("{} value out of range (0-{}): {}, using default", name, max, n);
            None
        }
        Err(_) => {
            warn!("Invalid {} value: {}, using default", name, value);
            None
        }
    }
}
