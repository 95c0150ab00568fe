//! Core domain types for Synaptic.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod calibration;
mod emotion;
mod expiry;
mod module_id;
mod phase;
mod settings;
mod snapshot;
mod stage;

pub use calibration::{Calibration, Percent};
pub use emotion::{EmotionProfile, EmotionReading, EmotionalState, INTENSITY_JITTER};
pub use expiry::Expiry;
pub use module_id::ModuleId;
pub use phase::CognitivePhase;
pub use settings::{
    DEFAULT_HIGHLIGHT_WINDOW, DEFAULT_PHASE_TICK, DEFAULT_QUIET_WINDOW, EngineSettings,
    SettingsError, Timing,
};
pub use snapshot::{EngineSnapshot, SessionRecap};
pub use stage::SessionStage;

use thiserror::Error;

// ============================================================================
// Boundary validation
// ============================================================================

/// Input rejected at the engine boundary.
///
/// Rejection is always a no-op on engine state; callers get this value back
/// instead of a silently corrupted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown emotional state '{0}' (expected one of: {names})", names = emotion_names())]
    UnknownEmotion(String),
    #[error("unknown cognitive phase '{0}'")]
    UnknownPhase(String),
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

fn emotion_names() -> String {
    EmotionalState::ALL
        .iter()
        .map(|state| state.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a calibration dial from untrusted text; numeric values are clamped.
pub fn parse_percent(raw: &str) -> Result<Percent, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(Percent::clamped)
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))
}
