//! Interaction recency tracking.
//!
//! Each interaction (re)starts two independent windows: a short module
//! highlight and a longer quiet window that defines "the user is active".
//! Both are deadlines, so reads are derived from the clock rather than from a
//! cached flag that a timer must remember to clear.

use std::time::{Duration, Instant};

use synaptic_types::{Expiry, ModuleId, Timing};

/// What `expire` cleared, used by the engine to emit transition events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub highlight: bool,
    pub quiet: bool,
}

#[derive(Debug)]
pub struct ActivityTracker {
    highlight_window: Duration,
    quiet_window: Duration,
    interaction_count: u64,
    /// At most one pending highlight; a new interaction replaces it.
    highlight: Option<(ModuleId, Expiry)>,
    /// At most one pending quiet window; a new interaction replaces it.
    quiet: Option<Expiry>,
}

impl ActivityTracker {
    #[must_use]
    pub fn new(timing: &Timing) -> Self {
        Self {
            highlight_window: timing.highlight(),
            quiet_window: timing.quiet(),
            interaction_count: 0,
            highlight: None,
            quiet: None,
        }
    }

    pub fn record_interaction(&mut self, module: ModuleId, now: Instant) {
        self.interaction_count = self.interaction_count.saturating_add(1);
        self.highlight = Some((module, Expiry::start(now, self.highlight_window)));
        self.quiet = Some(Expiry::start(now, self.quiet_window));
    }

    #[must_use]
    pub fn interaction_count(&self) -> u64 {
        self.interaction_count
    }

    /// True iff an interaction happened within the quiet window before `now`.
    #[must_use]
    pub fn is_user_active(&self, now: Instant) -> bool {
        self.quiet.is_some_and(|quiet| quiet.is_pending(now))
    }

    #[must_use]
    pub fn active_module(&self, now: Instant) -> Option<&ModuleId> {
        self.highlight
            .as_ref()
            .filter(|(_, expiry)| expiry.is_pending(now))
            .map(|(module, _)| module)
    }

    #[must_use]
    pub fn highlight_progress(&self, now: Instant) -> Option<f32> {
        self.highlight
            .as_ref()
            .filter(|(_, expiry)| expiry.is_pending(now))
            .map(|(_, expiry)| expiry.progress(now))
    }

    /// Drop windows that have elapsed by `now`.
    pub fn expire(&mut self, now: Instant) -> Expired {
        let mut expired = Expired::default();
        if self
            .highlight
            .as_ref()
            .is_some_and(|(_, expiry)| !expiry.is_pending(now))
        {
            self.highlight = None;
            expired.highlight = true;
        }
        if self.quiet.is_some_and(|quiet| !quiet.is_pending(now)) {
            self.quiet = None;
            expired.quiet = true;
        }
        expired
    }

    /// Earliest deadline still pending, for schedulers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let highlight = self.highlight.as_ref().map(|(_, expiry)| expiry.deadline());
        let quiet = self.quiet.map(|expiry| expiry.deadline());
        match (highlight, quiet) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
