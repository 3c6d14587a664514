//! Mapping from user-facing controls to engine knobs

use crate::simulation::{SimulationEngine, Speed};
use std::fmt;

pub const SLIDER_MIN: f32 = 1.0;
/// Slider position that switches the engine to full speed
pub const SLIDER_MAX: f32 = 10.0;

/// A `1..=10` speed slider
///
/// The slider value becomes the engine's speed divider, except the top
/// position, which means "no delay at all".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSlider {
    value: f32,
}

impl SpeedSlider {
    pub fn new(value: f32) -> Self {
        let value = if value.is_nan() {
            SLIDER_MIN
        } else {
            value.clamp(SLIDER_MIN, SLIDER_MAX)
        };
        Self { value }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_full_speed(&self) -> bool {
        self.value >= SLIDER_MAX
    }

    /// Speed settings for this slider position, keeping the base delay
    pub fn apply_to(self, speed: Speed) -> Speed {
        Speed {
            speed_divider: f64::from(self.value),
            full_speed: self.is_full_speed(),
            ..speed
        }
    }

    pub fn apply(self, engine: &SimulationEngine) {
        engine.set_speed(self.apply_to(engine.speed()));
    }
}

impl Default for SpeedSlider {
    fn default() -> Self {
        Self::new(SLIDER_MIN)
    }
}

impl fmt::Display for SpeedSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full_speed() {
            write!(f, "Speed: {} (full)", self.value)
        } else {
            write!(f, "Speed: {}", self.value)
        }
    }
}
