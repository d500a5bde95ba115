//! Visual states: bandwidth bands mapped onto the front-panel LEDs.
//!
//! ```text
//!   usage % ──▶ classify ──▶ VisualState ──▶ StateApplier ──▶ LedPort
//! ```
//!
//! | State  | netdev | disk1 | disk2 | colour |
//! |--------|--------|-------|-------|--------|
//! | Off    | off    | off   | off   | -      |
//! | Low    | on     | off   | off   | green  |
//! | Medium | on     | on    | off   | blue   |
//! | High   | on     | on    | on    | red    |
//!
//! The power LED is not part of the state; it is asserted white on every
//! apply.

pub mod applier;
pub mod classifier;
pub mod manager;

use core::fmt;

use crate::protocol::{COLOR_BLUE, COLOR_GREEN, COLOR_OFF, COLOR_RED, RgbColor};

pub use applier::StateApplier;
pub use classifier::classify;
pub use manager::LedStateManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    Off,
    Low,
    Medium,
    High,
}

/// What the utilisation LEDs should show for one [`VisualState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedTargets {
    pub netdev_on: bool,
    pub disk1_on: bool,
    pub disk2_on: bool,
    pub color: RgbColor,
}

impl VisualState {
    pub const fn targets(self) -> LedTargets {
        match self {
            Self::Off => LedTargets {
                netdev_on: false,
                disk1_on: false,
                disk2_on: false,
                color: COLOR_OFF,
            },
            Self::Low => LedTargets {
                netdev_on: true,
                disk1_on: false,
                disk2_on: false,
                color: COLOR_GREEN,
            },
            Self::Medium => LedTargets {
                netdev_on: true,
                disk1_on: true,
                disk2_on: false,
                color: COLOR_BLUE,
            },
            Self::High => LedTargets {
                netdev_on: true,
                disk1_on: true,
                disk2_on: true,
                color: COLOR_RED,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "UTILIZATION_OFF",
            Self::Low => "NETDEV_GREEN",
            Self::Medium => "NETDEV_DISK1_BLUE",
            Self::High => "ALL_UTILIZATION_RED",
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
