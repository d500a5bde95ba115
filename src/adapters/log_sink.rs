//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                interface,
                capacity_mbps,
            } => {
                info!("START | interface={} capacity={}Mbps", interface, capacity_mbps);
            }
            AppEvent::Telemetry(r) => {
                debug!(
                    "TELEM | rx={:.1}Mbps tx={:.1}Mbps total={:.1}Mbps usage={:.1}%",
                    r.rx_mbps, r.tx_mbps, r.total_mbps, r.usage_percentage
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::SampleRejected {
                error,
                consecutive,
                max,
            } => {
                warn!("SAMPLE | rejected ({}/{}): {}", consecutive, max, error);
            }
            AppEvent::ApplyFailed { target, error } => {
                warn!("LEDS | apply {} failed: {}", target, error);
            }
            AppEvent::Stopped { cycles } => {
                info!("STOP | cycles={}", cycles);
            }
        }
    }
}
