//! Read-only views of engine state handed to presentation consumers.

use serde::Serialize;

use crate::{CognitivePhase, EmotionalState, ModuleId, Percent, SessionStage};

/// Everything a presentation layer may read in one render pass.
///
/// Built fresh on every read; consumers never mutate engine state through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub phase: CognitivePhase,
    pub emotional_state: EmotionalState,
    pub introspection_depth: Percent,
    pub cognitive_load: Percent,
    pub emotional_sensitivity: Percent,
    pub is_user_active: bool,
    pub active_module_id: Option<ModuleId>,
    /// Fraction of the highlight window already elapsed, `None` without a highlight.
    pub highlight_progress: Option<f32>,
    pub interaction_count: u64,
    pub stage_index: usize,
    pub stage: SessionStage,
    pub session_finished: bool,
    pub initial_emotional_state: EmotionalState,
    /// Most recent emotion readings, newest first.
    pub recent_emotions: Vec<EmotionalState>,
}

impl EngineSnapshot {
    #[must_use]
    pub fn is_last_stage(&self) -> bool {
        self.stage.is_last()
    }

    #[must_use]
    pub fn recap(&self) -> SessionRecap {
        SessionRecap::new(
            self.initial_emotional_state,
            self.emotional_state,
            self.interaction_count,
            self.stage,
            self.session_finished,
        )
    }
}

/// Summary shown on the completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionRecap {
    pub initial_emotional_state: EmotionalState,
    pub current_emotional_state: EmotionalState,
    pub interaction_count: u64,
    pub stages_completed: usize,
    pub session_finished: bool,
}

impl SessionRecap {
    /// A finished session counts every stage as completed; otherwise only the
    /// stages before the current one.
    #[must_use]
    pub fn new(
        initial: EmotionalState,
        current: EmotionalState,
        interaction_count: u64,
        stage: SessionStage,
        finished: bool,
    ) -> Self {
        Self {
            initial_emotional_state: initial,
            current_emotional_state: current,
            interaction_count,
            stages_completed: if finished {
                SessionStage::COUNT
            } else {
                stage.index()
            },
            session_finished: finished,
        }
    }

    /// `"<initial> → <current>"`, e.g. `"anxious → calm"`.
    #[must_use]
    pub fn mood_shift(&self) -> String {
        format!(
            "{} → {}",
            self.initial_emotional_state, self.current_emotional_state
        )
    }

    #[must_use]
    pub fn mood_changed(&self) -> bool {
        self.initial_emotional_state != self.current_emotional_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> EngineSnapshot {
        EngineSnapshot {
            phase: CognitivePhase::Observing,
            emotional_state: EmotionalState::Focused,
            introspection_depth: Percent::clamped(50),
            cognitive_load: Percent::clamped(30),
            emotional_sensitivity: Percent::clamped(70),
            is_user_active: false,
            active_module_id: None,
            highlight_progress: None,
            interaction_count: 7,
            stage_index: 3,
            stage: SessionStage::Reframe,
            session_finished: false,
            initial_emotional_state: EmotionalState::Anxious,
            recent_emotions: vec![EmotionalState::Focused],
        }
    }

    #[test]
    fn recap_mood_shift() {
        let recap = snapshot().recap();
        assert_eq!(recap.mood_shift(), "anxious → focused");
        assert!(recap.mood_changed());
        assert_eq!(recap.stages_completed, 3);
    }

    #[test]
    fn finished_recap_counts_every_stage() {
        let mut snap = snapshot();
        snap.stage_index = 4;
        snap.stage = SessionStage::Reflection;
        snap.session_finished = true;
        assert!(snap.is_last_stage());
        assert_eq!(snap.recap().stages_completed, SessionStage::COUNT);
    }

    #[test]
    fn snapshot_serializes_lowercase_enums() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["phase"], "observing");
        assert_eq!(json["stage"], "reframe");
        assert_eq!(json["introspection_depth"], 50);
        assert!(json["active_module_id"].is_null());
    }
}
