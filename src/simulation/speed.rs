//! Inter-generation delay control

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest divider the engine will use
pub const MIN_SPEED_DIVIDER: f64 = 1.0;

/// Speed knobs for the simulation worker
///
/// The delay between generations is `delay_ms / speed_divider`, or zero when
/// `full_speed` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub delay_ms: u64,
    pub speed_divider: f64,
    pub full_speed: bool,
}

impl Default for Speed {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            speed_divider: MIN_SPEED_DIVIDER,
            full_speed: false,
        }
    }
}

impl Speed {
    /// Divider clamped to `>= 1`, with non-finite values treated as the minimum
    pub fn effective_divider(&self) -> f64 {
        if self.speed_divider.is_finite() {
            self.speed_divider.max(MIN_SPEED_DIVIDER)
        } else {
            MIN_SPEED_DIVIDER
        }
    }

    /// Time the worker waits after committing a generation
    pub fn step_delay(&self) -> Duration {
        if self.full_speed {
            return Duration::ZERO;
        }
        let nanos = self.delay_ms as f64 * 1_000_000.0 / self.effective_divider();
        Duration::from_nanos(nanos as u64)
    }
}
