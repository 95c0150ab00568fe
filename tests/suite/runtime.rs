//! The engine task under paused tokio time.

use std::time::Duration;

use synaptic_engine::{
    CognitivePhase, EmotionalState, EngineEvent, EngineRuntime, EngineSettings, RuntimeError,
    ScriptedDraws, SessionStage,
};
use tokio::{task, time};

fn spawn(draws: ScriptedDraws) -> EngineRuntime {
    EngineRuntime::spawn(&EngineSettings::default(), Box::new(draws))
}

#[tokio::test(start_paused = true)]
async fn runtime_reproduces_interaction_lifecycle() {
    let runtime = spawn(ScriptedDraws::new([]));
    let handle = runtime.handle();

    let snapshot = handle.interact("mirror").await.unwrap();
    assert_eq!(snapshot.interaction_count, 1);
    assert!(snapshot.is_user_active);

    time::sleep(Duration::from_millis(2000)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_module_id, None);
    assert!(snapshot.is_user_active);

    time::sleep(Duration::from_millis(1000)).await;
    assert!(!handle.snapshot().await.unwrap().is_user_active);
}

#[tokio::test(start_paused = true)]
async fn timer_ticks_arrive_as_events() {
    let runtime = spawn(ScriptedDraws::new([0.5, 0.9]));
    let handle = runtime.handle();
    let mut events = handle.subscribe_events();

    handle
        .record_emotion_scan(EmotionalState::Energized, 0.85)
        .await
        .unwrap();
    handle.interact("emotion").await.unwrap();

    let mut seen = Vec::new();
    while !seen
        .iter()
        .any(|event| matches!(event, EngineEvent::PhaseChanged { .. }))
    {
        seen.push(events.recv().await.unwrap());
    }
    assert_eq!(
        seen.last(),
        Some(&EngineEvent::PhaseChanged {
            from: CognitivePhase::Observing,
            to: CognitivePhase::Breakthrough,
        })
    );
    assert!(seen.contains(&EngineEvent::ActivityChanged { active: false }));
}

#[tokio::test(start_paused = true)]
async fn session_flow_over_the_handle() {
    let runtime = spawn(ScriptedDraws::new([]));
    let handle = runtime.handle();

    for _ in 0..4 {
        handle.advance_stage().await.unwrap();
    }
    let snapshot = handle.finish_session().await.unwrap();
    assert_eq!(snapshot.stage, SessionStage::Reflection);
    assert!(snapshot.session_finished);

    let snapshot = handle.start_new_session().await.unwrap();
    assert_eq!(snapshot.stage_index, 0);
    assert!(!snapshot.session_finished);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_runtime_stops_the_task() {
    let runtime = spawn(ScriptedDraws::new([]));
    let handle = runtime.handle();
    drop(runtime);
    // Let the aborted task unwind.
    task::yield_now().await;

    assert_eq!(
        handle.retreat_stage().await.unwrap_err(),
        RuntimeError::Closed
    );
}
