//! End-to-end session flows through the public engine API.

use synaptic_engine::{CognitivePhase, EmotionalState, EngineEvent, SessionStage};

use crate::common::{module, ms, scripted_engine};

#[test]
fn interaction_highlight_and_decay() {
    let (mut engine, t0) = scripted_engine([]);
    engine.record_interaction("mirror", t0);

    let snapshot = engine.snapshot(t0);
    assert_eq!(snapshot.interaction_count, 1);
    assert_eq!(snapshot.active_module_id, Some(module("mirror")));
    assert!(snapshot.is_user_active);

    engine.advance_clock(t0 + ms(2000));
    let snapshot = engine.snapshot(t0 + ms(2000));
    assert_eq!(snapshot.active_module_id, None);
    assert!(snapshot.is_user_active);

    engine.advance_clock(t0 + ms(3000));
    assert!(!engine.snapshot(t0 + ms(3000)).is_user_active);
}

#[test]
fn calm_override_reaches_integrating() {
    let (mut engine, t0) = scripted_engine([0.0, 0.65]);
    engine.record_interaction(module("stream"), t0);
    engine.advance_clock(t0 + ms(4000));

    assert_eq!(
        engine.snapshot(t0 + ms(4000)).phase,
        CognitivePhase::Integrating
    );
    assert_eq!(
        engine.drain_events().last(),
        Some(&EngineEvent::PhaseChanged {
            from: CognitivePhase::Observing,
            to: CognitivePhase::Integrating,
        })
    );
}

#[test]
fn full_session_then_restart() {
    let (mut engine, t0) = scripted_engine([]);
    for _ in 0..4 {
        engine.advance_stage();
    }
    assert!(engine.is_last_stage());
    assert_eq!(engine.snapshot(t0).stage, SessionStage::Reflection);

    engine.finish_session();
    assert!(engine.snapshot(t0).session_finished);

    engine.start_new_session();
    let snapshot = engine.snapshot(t0);
    assert_eq!(snapshot.stage_index, 0);
    assert!(!snapshot.session_finished);
}

#[test]
fn mood_shift_spans_the_session() {
    let (mut engine, t0) = scripted_engine([]);
    engine.set_emotional_state_named("overwhelmed", t0).unwrap();
    engine.start_new_session();

    for (i, name) in ["mirror", "stream", "emotion"].into_iter().enumerate() {
        engine.record_interaction(name, t0 + ms(i as u64 * 500));
        engine.advance_stage();
    }
    engine.advance_stage();
    engine.set_emotional_state_named("focused", t0 + ms(2000)).unwrap();
    engine.finish_session();

    let recap = engine.recap();
    assert!(recap.session_finished);
    assert_eq!(recap.interaction_count, 3);
    assert_eq!(recap.stages_completed, 5);
    assert!(recap.mood_changed());
    assert_eq!(recap.mood_shift(), "overwhelmed → focused");
}

#[test]
fn phase_stays_observing_until_first_interaction() {
    let (mut engine, t0) = scripted_engine([0.99, 0.99]);
    engine.set_emotional_state(EmotionalState::Energized, t0);
    engine.advance_clock(t0 + ms(60_000));
    assert_eq!(
        engine.snapshot(t0 + ms(60_000)).phase,
        CognitivePhase::Observing
    );

    // The first effective tick is the next one on the original schedule.
    engine.record_interaction(module("framework"), t0 + ms(61_000));
    engine.advance_clock(t0 + ms(64_000));
    assert_eq!(
        engine.snapshot(t0 + ms(64_000)).phase,
        CognitivePhase::Breakthrough
    );
}
