//! Deadline-based expiry timers.
//!
//! The engine never schedules callbacks. Each timer is a deadline that is
//! compared against the caller-supplied clock on every read, so a state that
//! depends on "has this window elapsed" flips exactly at the deadline.

use std::time::{Duration, Instant};

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// A single pending expiry window `[started, started + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    started: Instant,
    duration: Duration,
}

impl Expiry {
    #[must_use]
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self {
            started: now,
            duration,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.started + self.duration
    }

    /// True while `now` is strictly before the deadline.
    #[must_use]
    pub fn is_pending(&self, now: Instant) -> bool {
        now < self.deadline()
    }

    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        normalized_progress(now.saturating_duration_since(self.started), self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::Expiry;
    use std::time::{Duration, Instant};

    #[test]
    fn pending_until_deadline() {
        let t0 = Instant::now();
        let expiry = Expiry::start(t0, Duration::from_millis(3000));
        assert!(expiry.is_pending(t0));
        assert!(expiry.is_pending(t0 + Duration::from_millis(2999)));
        assert!(!expiry.is_pending(t0 + Duration::from_millis(3000)));
        assert!(!expiry.is_pending(t0 + Duration::from_millis(9000)));
    }

    #[test]
    fn progress_clamped() {
        let t0 = Instant::now();
        let expiry = Expiry::start(t0, Duration::from_millis(200));
        assert!(expiry.progress(t0) < 0.01);
        let half = expiry.progress(t0 + Duration::from_millis(100));
        assert!((half - 0.5).abs() < 0.01);
        assert!((expiry.progress(t0 + Duration::from_secs(10)) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_is_never_pending() {
        let t0 = Instant::now();
        let expiry = Expiry::start(t0, Duration::ZERO);
        assert!(!expiry.is_pending(t0));
        assert!((expiry.progress(t0) - 1.0).abs() < f32::EPSILON);
    }
}
