//! Core engine for Synaptic - the adaptive session state machine.
//!
//! This crate contains the engine without any presentation dependencies.
//! [`Engine`] is a synchronous value driven by caller-supplied instants;
//! [`runtime`] wraps it in a single-owner tokio task that runs the timers.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

use std::collections::VecDeque;
use std::time::Instant;

mod activity;
mod events;
mod phase;
pub mod runtime;
mod stage;


pub use activity::{ActivityTracker, Expired};
pub use events::{EVENT_QUEUE_CAPACITY, EngineEvent, EventQueue};
pub use phase::{
    DrawSource, PhaseTransition, PhaseTransitionProcess, ScriptedDraws, SeededDraws, select_phase,
};
pub use runtime::{EngineHandle, EngineRuntime, RuntimeError};
pub use stage::{SessionStageController, StageTransition};

pub use synaptic_types::{
    Calibration, CognitivePhase, EmotionProfile, EmotionReading, EmotionalState, EngineSettings,
    EngineSnapshot, INTENSITY_JITTER, ModuleId, Percent, SessionRecap, SessionStage, Timing,
    ValidationError,
};

/// Number of emotion readings kept, newest first.
pub const RECENT_EMOTIONS: usize = 4;

// ============================================================================
// EngineCommand - serialized mutations
// ============================================================================

/// Every external mutation, as a value.
///
/// The runtime queues these so concurrent callers are applied one at a time in
/// arrival order. Numeric dials carry the raw input; clamping happens on apply.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Interact(ModuleId),
    SetEmotion(EmotionalState),
    /// A classifier reading with its measured intensity.
    ScanEmotion {
        state: EmotionalState,
        intensity: f32,
    },
    SetIntrospectionDepth(i64),
    SetCognitiveLoad(i64),
    SetEmotionalSensitivity(i64),
    AdvanceStage,
    RetreatStage,
    FinishSession,
    StartNewSession,
}

// ============================================================================
// Engine - the facade
// ============================================================================

/// Composes activity tracking, phase selection and stage progression.
///
/// The engine never reads the clock itself. Every operation that depends on
/// time takes `now`, and mutating operations first catch the timers up to
/// `now` so that ticks due earlier observe the state as it was then.
#[derive(Debug)]
pub struct Engine {
    activity: ActivityTracker,
    phase: PhaseTransitionProcess,
    stages: SessionStageController,
    emotion: EmotionalState,
    calibration: Calibration,
    readings: VecDeque<EmotionReading>,
    events: EventQueue,
    /// Last activity value announced through `ActivityChanged`.
    reported_active: bool,
}

impl Engine {
    pub fn new(settings: &EngineSettings, draws: Box<dyn DrawSource>, now: Instant) -> Self {
        let calibration = Calibration {
            introspection_depth: settings.introspection_depth,
            ..Calibration::default()
        };
        tracing::debug!(
            emotion = %settings.initial_emotion,
            depth = %settings.introspection_depth,
            "Engine created"
        );
        Self {
            activity: ActivityTracker::new(&settings.timing),
            phase: PhaseTransitionProcess::new(settings.timing.phase_tick(), now, draws),
            stages: SessionStageController::new(settings.initial_emotion),
            emotion: settings.initial_emotion,
            calibration,
            readings: VecDeque::with_capacity(RECENT_EMOTIONS),
            events: EventQueue::new(),
            reported_active: false,
        }
    }

    /// Build an engine whose draws come from the configured seed, or from
    /// entropy when no seed is set.
    pub fn from_settings(settings: &EngineSettings, now: Instant) -> Self {
        let draws = match settings.seed {
            Some(seed) => SeededDraws::seeded(seed),
            None => SeededDraws::from_entropy(),
        };
        Self::new(settings, Box::new(draws), now)
    }

    // ------------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------------

    /// Apply every phase tick and expiry due by `now`, oldest deadline first.
    pub fn advance_clock(&mut self, now: Instant) {
        loop {
            let due = self.next_deadline();
            if due > now {
                break;
            }
            if due == self.phase.next_tick() {
                let count = self.activity.interaction_count();
                for PhaseTransition { from, to } in
                    self.phase.run_due_ticks(due, count, self.emotion)
                {
                    self.events.push(EngineEvent::PhaseChanged { from, to });
                }
            } else {
                let expired = self.activity.expire(due);
                tracing::trace!(
                    highlight = expired.highlight,
                    quiet = expired.quiet,
                    "Activity windows expired"
                );
                self.sync_activity(due);
            }
        }
    }

    /// Earliest instant at which `advance_clock` would change something.
    #[must_use]
    pub fn next_deadline(&self) -> Instant {
        let tick = self.phase.next_tick();
        self.activity
            .next_deadline()
            .map_or(tick, |deadline| deadline.min(tick))
    }

    fn sync_activity(&mut self, now: Instant) {
        let active = self.activity.is_user_active(now);
        if active != self.reported_active {
            self.reported_active = active;
            tracing::debug!(active, "Activity changed");
            self.events.push(EngineEvent::ActivityChanged { active });
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Any id is accepted, including the empty one.
    pub fn record_interaction(&mut self, module: impl Into<ModuleId>, now: Instant) {
        let module = module.into();
        self.advance_clock(now);
        if !module.is_known() {
            tracing::debug!(module = ?module.as_str(), "Interaction with an unrecognized module");
        }
        self.activity.record_interaction(module, now);
        tracing::debug!(
            count = self.activity.interaction_count(),
            "Interaction recorded"
        );
        self.sync_activity(now);
    }

    pub fn set_emotional_state(&mut self, state: EmotionalState, now: Instant) {
        self.record_reading(EmotionReading::nominal(state, now));
    }

    /// Like [`Engine::set_emotional_state`], keeping the scan's intensity in
    /// the readings history.
    pub fn record_emotion_scan(&mut self, state: EmotionalState, intensity: f32, now: Instant) {
        self.record_reading(EmotionReading::measured(state, intensity, now));
    }

    fn record_reading(&mut self, reading: EmotionReading) {
        let EmotionReading { state, at: now, .. } = reading;
        self.advance_clock(now);
        let since_previous = self
            .readings
            .front()
            .map(|previous| now.saturating_duration_since(previous.at));
        tracing::debug!(
            %state,
            intensity = reading.intensity,
            ?since_previous,
            "Emotion reading"
        );
        if self.readings.len() == RECENT_EMOTIONS {
            self.readings.pop_back();
        }
        self.readings.push_front(reading);

        let from = self.emotion;
        self.emotion = state;
        if from != state {
            tracing::info!(%from, to = %state, "Emotional state changed");
            self.events.push(EngineEvent::EmotionChanged { from, to: state });
        }
    }

    /// String-boundary form of [`Engine::set_emotional_state`].
    pub fn set_emotional_state_named(
        &mut self,
        raw: &str,
        now: Instant,
    ) -> Result<(), ValidationError> {
        let state = raw.parse::<EmotionalState>().inspect_err(|err| {
            tracing::warn!("Rejected emotional state: {err}");
        })?;
        self.set_emotional_state(state, now);
        Ok(())
    }

    pub fn set_introspection_depth(&mut self, depth: i64) {
        self.calibration.introspection_depth = Percent::clamped(depth);
    }

    pub fn set_cognitive_load(&mut self, load: i64) {
        self.calibration.cognitive_load = Percent::clamped(load);
    }

    pub fn set_emotional_sensitivity(&mut self, sensitivity: i64) {
        self.calibration.emotional_sensitivity = Percent::clamped(sensitivity);
    }

    pub fn advance_stage(&mut self) {
        if let Some(transition) = self.stages.advance() {
            self.push_stage_change(transition);
        }
    }

    pub fn retreat_stage(&mut self) {
        if let Some(transition) = self.stages.retreat(self.emotion) {
            self.push_stage_change(transition);
        }
    }

    pub fn finish_session(&mut self) {
        if self.stages.finish() {
            let recap = self.recap();
            tracing::info!(
                mood_shift = %recap.mood_shift(),
                interactions = recap.interaction_count,
                "Session finished"
            );
            self.events.push(EngineEvent::SessionFinished { recap });
        }
    }

    /// Back to the first stage. Interaction count, phase and emotion carry over.
    pub fn start_new_session(&mut self) {
        let from = self.stages.stage();
        self.stages.start_new_session(self.emotion);
        tracing::info!(baseline = %self.emotion, "New session started");
        if from != SessionStage::FIRST {
            self.events.push(EngineEvent::StageChanged {
                from,
                to: SessionStage::FIRST,
            });
        }
        self.events.push(EngineEvent::SessionStarted);
    }

    fn push_stage_change(&mut self, StageTransition { from, to }: StageTransition) {
        tracing::info!(%from, %to, progress = to.progress_percent(), "Stage changed");
        self.events.push(EngineEvent::StageChanged { from, to });
    }

    /// Dispatch a queued command.
    pub fn apply(&mut self, command: EngineCommand, now: Instant) {
        match command {
            EngineCommand::Interact(module) => self.record_interaction(module, now),
            EngineCommand::SetEmotion(state) => self.set_emotional_state(state, now),
            EngineCommand::ScanEmotion { state, intensity } => {
                self.record_emotion_scan(state, intensity, now);
            }
            EngineCommand::SetIntrospectionDepth(value) => self.set_introspection_depth(value),
            EngineCommand::SetCognitiveLoad(value) => self.set_cognitive_load(value),
            EngineCommand::SetEmotionalSensitivity(value) => {
                self.set_emotional_sensitivity(value);
            }
            EngineCommand::AdvanceStage => self.advance_stage(),
            EngineCommand::RetreatStage => self.retreat_stage(),
            EngineCommand::FinishSession => self.finish_session(),
            EngineCommand::StartNewSession => self.start_new_session(),
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Immutable view at `now`.
    ///
    /// Derived timer state (activity, highlight) is read against `now`; phase
    /// ticks are not run. Call [`Engine::advance_clock`] first to include them.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> EngineSnapshot {
        let stage = self.stages.stage();
        EngineSnapshot {
            phase: self.phase.phase(),
            emotional_state: self.emotion,
            introspection_depth: self.calibration.introspection_depth,
            cognitive_load: self.calibration.cognitive_load,
            emotional_sensitivity: self.calibration.emotional_sensitivity,
            is_user_active: self.activity.is_user_active(now),
            active_module_id: self.activity.active_module(now).cloned(),
            highlight_progress: self.activity.highlight_progress(now),
            interaction_count: self.activity.interaction_count(),
            stage_index: stage.index(),
            stage,
            session_finished: self.stages.is_finished(),
            initial_emotional_state: self.stages.initial_emotion(),
            recent_emotions: self.recent_readings().map(|reading| reading.state).collect(),
        }
    }

    #[must_use]
    pub fn recap(&self) -> SessionRecap {
        SessionRecap::new(
            self.stages.initial_emotion(),
            self.emotion,
            self.activity.interaction_count(),
            self.stages.stage(),
            self.stages.is_finished(),
        )
    }

    #[must_use]
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    #[must_use]
    pub fn recent_readings(&self) -> impl Iterator<Item = &EmotionReading> {
        self.readings.iter()
    }

    #[must_use]
    pub fn is_last_stage(&self) -> bool {
        self.stages.is_last_stage()
    }

    /// Take queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.take()
    }
}
