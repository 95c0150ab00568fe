//! Resolved engine settings shared across crates.
//!
//! Raw TOML structs (with `Option` fields) stay private in `synaptic-config`.
//! The loader resolves them into these types at the parse boundary, so holding
//! an `EngineSettings` is proof that its timing windows are coherent.

use std::time::Duration;

use crate::{EmotionalState, Percent};

pub const DEFAULT_PHASE_TICK: Duration = Duration::from_millis(4000);
pub const DEFAULT_HIGHLIGHT_WINDOW: Duration = Duration::from_millis(2000);
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("phase tick period must be greater than zero")]
    ZeroPhaseTick,
    #[error("quiet window must be greater than zero")]
    ZeroQuietWindow,
    #[error("highlight window ({highlight:?}) must not exceed the quiet window ({quiet:?})")]
    HighlightOutlastsQuiet { highlight: Duration, quiet: Duration },
}

/// Validated timer periods.
///
/// Invariant: the phase tick and quiet window are non-zero, and the highlight
/// window never outlasts the quiet window, so a highlighted module always
/// implies an active user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    phase_tick: Duration,
    highlight: Duration,
    quiet: Duration,
}

impl Timing {
    pub fn new(
        phase_tick: Duration,
        highlight: Duration,
        quiet: Duration,
    ) -> Result<Self, SettingsError> {
        if phase_tick.is_zero() {
            return Err(SettingsError::ZeroPhaseTick);
        }
        if quiet.is_zero() {
            return Err(SettingsError::ZeroQuietWindow);
        }
        if highlight > quiet {
            return Err(SettingsError::HighlightOutlastsQuiet { highlight, quiet });
        }
        Ok(Self {
            phase_tick,
            highlight,
            quiet,
        })
    }

    #[must_use]
    pub fn phase_tick(&self) -> Duration {
        self.phase_tick
    }

    #[must_use]
    pub fn highlight(&self) -> Duration {
        self.highlight
    }

    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            phase_tick: DEFAULT_PHASE_TICK,
            highlight: DEFAULT_HIGHLIGHT_WINDOW,
            quiet: DEFAULT_QUIET_WINDOW,
        }
    }
}

/// Everything needed to construct an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub timing: Timing,
    pub initial_emotion: EmotionalState,
    pub introspection_depth: Percent,
    /// Seed for the phase draw source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            initial_emotion: EmotionalState::default(),
            introspection_depth: Percent::clamped(50),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let timing = Timing::default();
        assert_eq!(
            Timing::new(timing.phase_tick(), timing.highlight(), timing.quiet()),
            Ok(timing)
        );
    }

    #[test]
    fn rejects_zero_periods() {
        assert_eq!(
            Timing::new(Duration::ZERO, DEFAULT_HIGHLIGHT_WINDOW, DEFAULT_QUIET_WINDOW),
            Err(SettingsError::ZeroPhaseTick)
        );
        assert_eq!(
            Timing::new(DEFAULT_PHASE_TICK, Duration::ZERO, Duration::ZERO),
            Err(SettingsError::ZeroQuietWindow)
        );
    }

    #[test]
    fn rejects_highlight_longer_than_quiet() {
        let err = Timing::new(
            DEFAULT_PHASE_TICK,
            Duration::from_millis(5000),
            Duration::from_millis(3000),
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::HighlightOutlastsQuiet { .. }));
    }
}
