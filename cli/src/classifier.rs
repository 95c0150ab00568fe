//! Emotion scan for the `scan` console command.

use synaptic_engine::{DrawSource, EmotionalState, INTENSITY_JITTER, SeededDraws};

/// One classifier result: the detected state and how strongly it reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionScan {
    pub state: EmotionalState,
    pub intensity: f32,
}

/// Produces an emotional state reading. The engine only consumes the result.
pub trait EmotionClassifier {
    fn classify(&mut self) -> EmotionScan;
}

/// Picks uniformly among the six states, then jitters the profile intensity
/// by up to half of [`INTENSITY_JITTER`] either way.
#[derive(Debug)]
pub struct RandomClassifier<D = SeededDraws> {
    draws: D,
}

impl RandomClassifier {
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        let draws = match seed {
            Some(seed) => SeededDraws::seeded(seed),
            None => SeededDraws::from_entropy(),
        };
        Self { draws }
    }
}

impl<D: DrawSource> RandomClassifier<D> {
    pub fn with_draws(draws: D) -> Self {
        Self { draws }
    }
}

impl<D: DrawSource> EmotionClassifier for RandomClassifier<D> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn classify(&mut self) -> EmotionScan {
        let states = EmotionalState::ALL;
        let index = (self.draws.draw() * states.len() as f64).floor() as usize;
        let state = states[index.min(states.len() - 1)];

        let jitter = (self.draws.draw() - 0.5) as f32 * INTENSITY_JITTER;
        let intensity = (state.profile().intensity + jitter).clamp(0.0, 1.0);
        EmotionScan { state, intensity }
    }
}

#[cfg(test)]
mod tests {
    use synaptic_engine::ScriptedDraws;

    use super::*;

    #[test]
    fn draws_map_onto_every_state() {
        let mut classifier = RandomClassifier::with_draws(ScriptedDraws::new([
            0.0, 0.5, 0.2, 0.5, 0.34, 0.5, 0.5, 0.5, 0.67, 0.5, 0.99, 0.5,
        ]));
        let seen: Vec<_> = (0..6).map(|_| classifier.classify().state).collect();
        assert_eq!(seen, EmotionalState::ALL.to_vec());
    }

    #[test]
    fn intensity_is_jittered_around_profile() {
        // Calm is nominally 0.4.
        let mut classifier =
            RandomClassifier::with_draws(ScriptedDraws::new([0.2, 0.0, 0.2, 0.5, 0.2, 0.99]));
        let low = classifier.classify();
        assert_eq!(low.state, EmotionalState::Calm);
        assert!((low.intensity - 0.3).abs() < 1e-6);
        assert!((classifier.classify().intensity - 0.4).abs() < 1e-6);
        assert!((classifier.classify().intensity - 0.498).abs() < 1e-6);
    }

    #[test]
    fn seeded_classifier_is_reproducible() {
        let mut a = RandomClassifier::from_seed(Some(9));
        let mut b = RandomClassifier::from_seed(Some(9));
        for _ in 0..20 {
            let (x, y) = (a.classify(), b.classify());
            assert_eq!(x, y);
            let nominal = x.state.profile().intensity;
            assert!((x.intensity - nominal).abs() <= INTENSITY_JITTER / 2.0 + 1e-6);
        }
    }
}
