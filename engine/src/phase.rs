//! Emotion-conditioned phase selection.
//!
//! Every `period` the process draws a uniform candidate phase, then gives the
//! current emotional state a chance to force its characteristic phase. Ticks are
//! inert until the first interaction.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;

use synaptic_types::{CognitivePhase, EmotionalState};

/// Source of independent samples in `[0, 1)`.
pub trait DrawSource: Send {
    fn draw(&mut self) -> f64;
}

/// Seedable pseudo-random draws.
#[derive(Debug)]
pub struct SeededDraws {
    rng: StdRng,
}

impl SeededDraws {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }
}

impl DrawSource for SeededDraws {
    fn draw(&mut self) -> f64 {
        StandardUniform.sample(&mut self.rng)
    }
}

/// Replays a fixed list of draws, then repeats `fallback` forever.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    queue: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedDraws {
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: draws.into_iter().collect(),
            fallback: 0.0,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DrawSource for ScriptedDraws {
    fn draw(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

/// `(state, threshold, forced phase)` in precedence order.
const OVERRIDES: [(EmotionalState, f64, CognitivePhase); 3] = [
    (
        EmotionalState::Overwhelmed,
        0.7,
        CognitivePhase::Processing,
    ),
    (EmotionalState::Calm, 0.6, CognitivePhase::Integrating),
    (
        EmotionalState::Energized,
        0.5,
        CognitivePhase::Breakthrough,
    ),
];

/// Pick the next phase.
///
/// Consumes one draw for the uniform candidate, plus one override draw only
/// when `emotion` has an override rule.
pub fn select_phase(draws: &mut dyn DrawSource, emotion: EmotionalState) -> CognitivePhase {
    let candidate = CognitivePhase::from_unit_draw(draws.draw());
    for (state, threshold, forced) in OVERRIDES {
        if emotion == state && draws.draw() > threshold {
            return forced;
        }
    }
    candidate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: CognitivePhase,
    pub to: CognitivePhase,
}

pub struct PhaseTransitionProcess {
    phase: CognitivePhase,
    period: Duration,
    next_tick: Instant,
    draws: Box<dyn DrawSource>,
}

impl fmt::Debug for PhaseTransitionProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTransitionProcess")
            .field("phase", &self.phase)
            .field("period", &self.period)
            .field("next_tick", &self.next_tick)
            .finish_non_exhaustive()
    }
}

impl PhaseTransitionProcess {
    #[must_use]
    pub fn new(period: Duration, started: Instant, draws: Box<dyn DrawSource>) -> Self {
        Self {
            phase: CognitivePhase::default(),
            period,
            next_tick: started + period,
            draws,
        }
    }

    #[must_use]
    pub fn phase(&self) -> CognitivePhase {
        self.phase
    }

    #[must_use]
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Run every tick due by `now`.
    ///
    /// Inert ticks (no interactions yet) still advance the schedule so they are
    /// never replayed later.
    pub fn run_due_ticks(
        &mut self,
        now: Instant,
        interaction_count: u64,
        emotion: EmotionalState,
    ) -> Vec<PhaseTransition> {
        let mut transitions = Vec::new();
        while self.next_tick <= now {
            self.next_tick += self.period;
            if interaction_count == 0 {
                tracing::trace!("Phase tick inert: no interactions yet");
                continue;
            }
            let from = self.phase;
            self.phase = select_phase(self.draws.as_mut(), emotion);
            tracing::debug!(%from, to = %self.phase, %emotion, "Phase tick");
            transitions.push(PhaseTransition {
                from,
                to: self.phase,
            });
        }
        transitions
    }
}
