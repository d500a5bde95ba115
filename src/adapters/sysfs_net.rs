//! Network counter adapter.
//!
//! Implements [`CounterSource`] from the kernel's per-interface byte
//! counters: `/sys/class/net/<if>/statistics/{rx,tx}_bytes` first, with
//! `/proc/net/dev` as fallback.  All paths hang off a configurable root
//! so tests can point it at a temporary tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::warn;

use crate::app::ports::CounterSource;
use crate::error::SamplingError;
use crate::sensors::bandwidth::CounterSample;

pub struct SysfsCounters {
    interface: String,
    root: PathBuf,
}

impl SysfsCounters {
    pub fn new(interface: impl Into<String>) -> Self {
        Self::with_root(interface, "/")
    }

    pub fn with_root(interface: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            interface: interface.into(),
            root: root.into(),
        }
    }

    fn net_dir(&self) -> PathBuf {
        self.root.join("sys/class/net").join(&self.interface)
    }

    fn read_sysfs(&self) -> Option<(u64, u64)> {
        let stats = self.net_dir().join("statistics");
        let rx = read_counter_file(&stats.join("rx_bytes"))?;
        let tx = read_counter_file(&stats.join("tx_bytes"))?;
        Some((rx, tx))
    }

    fn read_procfs(&self) -> Option<(u64, u64)> {
        let text = fs::read_to_string(self.root.join("proc/net/dev")).ok()?;
        parse_proc_net_dev(&text, &self.interface)
    }
}

impl CounterSource for SysfsCounters {
    fn interface(&self) -> &str {
        &self.interface
    }

    fn interface_exists(&self) -> bool {
        self.net_dir().exists()
    }

    fn read_counters(&mut self) -> Result<CounterSample, SamplingError> {
        let (rx_bytes, tx_bytes) = self
            .read_sysfs()
            .or_else(|| self.read_procfs())
            .ok_or_else(|| {
                warn!("Failed to read network stats for interface {}", self.interface);
                SamplingError::CountersUnavailable
            })?;
        Ok(CounterSample {
            rx_bytes,
            tx_bytes,
            timestamp: Instant::now(),
        })
    }
}

fn read_counter_file(path: &Path) -> Option<u64> {
    let text = fs::read_to_string(path).ok()?;
    let value = text.trim().parse().ok();
    if value.is_none() {
        warn!("Unparseable counter in {}: {:?}", path.display(), text.trim());
    }
    value
}

/// Extract `(rx_bytes, tx_bytes)` for `interface` from `/proc/net/dev`
/// text.  The first two lines are headers; rx bytes is the first field
/// after `iface:` and tx bytes the ninth.
pub fn parse_proc_net_dev(text: &str, interface: &str) -> Option<(u64, u64)> {
    text.lines().skip(2).find_map(|line| {
        let (name, fields) = line.split_once(':')?;
        if name.trim() != interface {
            return None;
        }
        let mut fields = fields.split_whitespace();
        let rx = fields.next()?.parse().ok()?;
        let tx = fields.nth(7)?.parse().ok()?;
        Some((rx, tx))
    })
}
