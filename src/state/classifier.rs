//! Utilisation → visual state.

use super::VisualState;
use crate::config::ThresholdSet;

/// Map a usage percentage onto half-open bands:
/// `[0, low)` Off, `[low, medium)` Low, `[medium, high)` Medium,
/// `[high, 100]` High.
pub fn classify(usage_percentage: f64, thresholds: &ThresholdSet) -> VisualState {
    if usage_percentage < f64::from(thresholds.low) {
        VisualState::Off
    } else if usage_percentage < f64::from(thresholds.medium) {
        VisualState::Low
    } else if usage_percentage < f64::from(thresholds.high) {
        VisualState::Medium
    } else {
        VisualState::High
    }
}
