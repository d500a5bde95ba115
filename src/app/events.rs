//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::error::{Error, SamplingError};
use crate::sensors::bandwidth::BandwidthReading;
use crate::state::VisualState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has a baseline and is about to poll.
    Started {
        interface: String,
        capacity_mbps: u32,
    },

    /// A valid bandwidth reading was taken.
    Telemetry(BandwidthReading),

    /// The LEDs moved to a new visual state.
    StateChanged { from: VisualState, to: VisualState },

    /// A poll produced no usable reading.
    SampleRejected {
        error: SamplingError,
        consecutive: u32,
        max: u32,
    },

    /// Writing a visual state to the LEDs failed.
    ApplyFailed { target: VisualState, error: Error },

    /// The poll loop ended.
    Stopped { cycles: u64 },
}
