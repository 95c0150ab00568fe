//! Calibration dials written by the external calibration panel.
//!
//! Every dial is a percentage in `[0, 100]`. Out-of-range inputs are clamped
//! at construction, never rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value clamped into `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const MIN: Percent = Percent(0);
    pub const MAX: Percent = Percent(100);

    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Percent {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The three calibration dials. Introspection depth is the one the rest of
/// the front-end reads; the other two only feed `resonance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calibration {
    pub introspection_depth: Percent,
    pub cognitive_load: Percent,
    pub emotional_sensitivity: Percent,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            introspection_depth: Percent(50),
            cognitive_load: Percent(30),
            emotional_sensitivity: Percent(70),
        }
    }
}

impl Calibration {
    /// Rounded mean of the three dials.
    #[must_use]
    pub fn resonance(&self) -> Percent {
        let sum = u32::from(self.introspection_depth.0)
            + u32::from(self.cognitive_load.0)
            + u32::from(self.emotional_sensitivity.0);
        // round half up
        Percent(((sum * 2 + 3) / 6) as u8)
    }
}
