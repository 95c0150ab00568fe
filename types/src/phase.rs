use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The engine's internally driven processing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitivePhase {
    #[default]
    Observing,
    Analyzing,
    Processing,
    Breakthrough,
    Integrating,
}

impl CognitivePhase {
    pub const ALL: [CognitivePhase; 5] = [
        CognitivePhase::Observing,
        CognitivePhase::Analyzing,
        CognitivePhase::Processing,
        CognitivePhase::Breakthrough,
        CognitivePhase::Integrating,
    ];

    /// Map a uniform sample in `[0, 1)` onto the phase set.
    ///
    /// Out-of-range samples are clamped onto the first or last phase.
    #[must_use]
    pub fn from_unit_draw(draw: f64) -> Self {
        let len = Self::ALL.len();
        let scaled = (draw.clamp(0.0, 1.0) * len as f64).floor() as usize;
        Self::ALL[scaled.min(len - 1)]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Observing => "observing",
            Self::Analyzing => "analyzing",
            Self::Processing => "processing",
            Self::Breakthrough => "breakthrough",
            Self::Integrating => "integrating",
        }
    }

    /// Display intensity used by the ambient feedback layer.
    #[must_use]
    pub const fn intensity(self) -> f32 {
        match self {
            Self::Observing => 0.3,
            Self::Analyzing => 0.6,
            Self::Processing => 0.8,
            Self::Breakthrough => 1.0,
            Self::Integrating => 0.5,
        }
    }
}

impl fmt::Display for CognitivePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CognitivePhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownPhase(needle.to_string()))
    }
}
