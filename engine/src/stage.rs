//! Session stage progression and the terminal completion state.

use synaptic_types::{EmotionalState, SessionStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: SessionStage,
    pub to: SessionStage,
}

/// Linear, clamped progression through the five session stages.
///
/// `finished` is set only from the last stage and cleared only by
/// `start_new_session`. Navigation does not touch it.
#[derive(Debug, Clone)]
pub struct SessionStageController {
    stage: SessionStage,
    finished: bool,
    initial_emotion: EmotionalState,
}

impl SessionStageController {
    /// Starts at the first stage, capturing `emotion` as the session's baseline.
    #[must_use]
    pub fn new(emotion: EmotionalState) -> Self {
        Self {
            stage: SessionStage::FIRST,
            finished: false,
            initial_emotion: emotion,
        }
    }

    #[must_use]
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    #[must_use]
    pub fn is_last_stage(&self) -> bool {
        self.stage.is_last()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn initial_emotion(&self) -> EmotionalState {
        self.initial_emotion
    }

    pub fn advance(&mut self) -> Option<StageTransition> {
        self.move_to(self.stage.next(), None)
    }

    /// Step back one stage. Re-entering the first stage recaptures `current`
    /// as the session's baseline emotion.
    pub fn retreat(&mut self, current: EmotionalState) -> Option<StageTransition> {
        self.move_to(self.stage.previous(), Some(current))
    }

    /// Mark the session finished. Returns `true` only on the transition.
    pub fn finish(&mut self) -> bool {
        if !self.is_last_stage() {
            tracing::debug!(stage = %self.stage, "Finish ignored: not at the last stage");
            return false;
        }
        if self.finished {
            return false;
        }
        self.finished = true;
        true
    }

    /// Hard reset to the first stage, recapturing the baseline emotion.
    pub fn start_new_session(&mut self, current: EmotionalState) {
        self.stage = SessionStage::FIRST;
        self.finished = false;
        self.initial_emotion = current;
    }

    fn move_to(
        &mut self,
        target: SessionStage,
        current: Option<EmotionalState>,
    ) -> Option<StageTransition> {
        if target == self.stage {
            tracing::debug!(stage = %self.stage, "Stage unchanged at boundary");
            return None;
        }
        let from = self.stage;
        self.stage = target;
        if target == SessionStage::FIRST
            && let Some(emotion) = current
        {
            self.initial_emotion = emotion;
        }
        Some(StageTransition { from, to: target })
    }
}
