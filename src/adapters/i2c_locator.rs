//! Finds the SMBus adapter the LED chip hangs off.
//!
//! Scans `/sys/class/i2c-dev/*/device/name` for the Intel I801 SMBus
//! controller and maps the matching entry to its `/dev/i2c-N` node.

use std::fs;
use std::path::PathBuf;

use log::{error, info};

use crate::app::ports::BusLocator;
use crate::error::TransportError;

/// Adapter name prefix reported by the i801 driver.
pub const ADAPTER_NAME_PREFIX: &str = "SMBus I801 adapter";

pub struct SysfsBusLocator {
    root: PathBuf,
}

impl Default for SysfsBusLocator {
    fn default() -> Self {
        Self::with_root("/")
    }
}

impl SysfsBusLocator {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BusLocator for SysfsBusLocator {
    fn locate(&self) -> Result<PathBuf, TransportError> {
        let class_dir = self.root.join("sys/class/i2c-dev");
        let entries = fs::read_dir(&class_dir).map_err(|e| {
            error!("I2C device path {} is unavailable: {}", class_dir.display(), e);
            TransportError::AdapterNotFound
        })?;

        let mut names: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name())
            .collect();
        names.sort();

        for name in names {
            let Ok(adapter) = fs::read_to_string(class_dir.join(&name).join("device/name")) else {
                continue;
            };
            if adapter.starts_with(ADAPTER_NAME_PREFIX) {
                let dev = self.root.join("dev").join(&name);
                info!("Found LED controller bus at {}", dev.display());
                return Ok(dev);
            }
        }

        error!("No compatible I2C adapter found");
        Err(TransportError::AdapterNotFound)
    }
}
