use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The user's self-reported mood, supplied by the decoder collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Overwhelmed,
    #[default]
    Calm,
    Distracted,
    Energized,
    Anxious,
    Focused,
}

/// Nominal intensity and a one-line description for an emotional state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionProfile {
    pub intensity: f32,
    pub description: &'static str,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 6] = [
        EmotionalState::Overwhelmed,
        EmotionalState::Calm,
        EmotionalState::Distracted,
        EmotionalState::Energized,
        EmotionalState::Anxious,
        EmotionalState::Focused,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overwhelmed => "overwhelmed",
            Self::Calm => "calm",
            Self::Distracted => "distracted",
            Self::Energized => "energized",
            Self::Anxious => "anxious",
            Self::Focused => "focused",
        }
    }

    #[must_use]
    pub const fn profile(self) -> EmotionProfile {
        match self {
            Self::Overwhelmed => EmotionProfile {
                intensity: 0.9,
                description: "High stress, need grounding",
            },
            Self::Calm => EmotionProfile {
                intensity: 0.4,
                description: "Balanced, receptive state",
            },
            Self::Distracted => EmotionProfile {
                intensity: 0.6,
                description: "Scattered focus, need centering",
            },
            Self::Energized => EmotionProfile {
                intensity: 0.8,
                description: "High motivation, ready for action",
            },
            Self::Anxious => EmotionProfile {
                intensity: 0.7,
                description: "Elevated concern, need reassurance",
            },
            Self::Focused => EmotionProfile {
                intensity: 0.5,
                description: "Clear mind, optimal state",
            },
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionalState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownEmotion(needle.to_string()))
    }
}

/// Jitter a classifier applies around a profile's nominal intensity.
pub const INTENSITY_JITTER: f32 = 0.2;

/// One emotional-state update, as kept in the recent-readings history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionReading {
    pub state: EmotionalState,
    /// In `[0, 1]`; the profile's nominal value unless a scan measured one.
    pub intensity: f32,
    pub at: Instant,
}

impl EmotionReading {
    /// Reading at the state's nominal intensity.
    #[must_use]
    pub fn nominal(state: EmotionalState, at: Instant) -> Self {
        Self::measured(state, state.profile().intensity, at)
    }

    /// Reading with a measured intensity, clamped to `[0, 1]`.
    #[must_use]
    pub fn measured(state: EmotionalState, intensity: f32, at: Instant) -> Self {
        let intensity = if intensity.is_nan() {
            state.profile().intensity
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            state,
            intensity,
            at,
        }
    }
}
