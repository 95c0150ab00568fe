//! Engine transition events.
//!
//! Consumers that want to react to changes (rather than diff snapshots) drain
//! these after each command or clock advance. The set of variants is closed;
//! only the engine constructs them.

use std::collections::VecDeque;

use synaptic_types::{CognitivePhase, EmotionalState, SessionRecap, SessionStage};

/// Maximum number of undrained events kept; older events are dropped first.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A phase tick ran. `from == to` is a visible no-op transition.
    PhaseChanged {
        from: CognitivePhase,
        to: CognitivePhase,
    },
    EmotionChanged {
        from: EmotionalState,
        to: EmotionalState,
    },
    StageChanged {
        from: SessionStage,
        to: SessionStage,
    },
    SessionFinished {
        recap: SessionRecap,
    },
    SessionStarted,
    /// The debounced activity signal flipped.
    ActivityChanged {
        active: bool,
    },
}

impl EngineEvent {
    /// One-line human-readable description.
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::PhaseChanged { from, to } if from == to => {
                format!("phase holds at {to}")
            }
            Self::PhaseChanged { from, to } => format!("phase {from} -> {to}"),
            Self::EmotionChanged { from, to } => format!("emotion {from} -> {to}"),
            Self::StageChanged { from, to } => format!(
                "stage {from} -> {to} ({}%)",
                to.progress_percent()
            ),
            Self::SessionFinished { recap } => format!(
                "session complete, mood shift {}",
                recap.mood_shift()
            ),
            Self::SessionStarted => "new session started".to_string(),
            Self::ActivityChanged { active: true } => "user active".to_string(),
            Self::ActivityChanged { active: false } => "user idle".to_string(),
        }
    }
}

/// Bounded FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<EngineEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EngineEvent) {
        if self.pending.len() == EVENT_QUEUE_CAPACITY {
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    /// Take all pending events in the order they happened.
    pub fn take(&mut self) -> Vec<EngineEvent> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
