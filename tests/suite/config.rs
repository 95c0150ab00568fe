//! Config files resolved into a running engine.

use std::fs;
use std::time::Instant;

use synaptic_config::{ConfigError, SynapticConfig};
use synaptic_engine::{EmotionalState, Engine};
use tempfile::tempdir;

use crate::common::{module, ms};

#[test]
fn configured_timing_drives_the_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[timing]
phase_tick_ms = 1000
highlight_ms = 500
quiet_ms = 800

[session]
initial_emotion = "anxious"
introspection_depth = 75
seed = 3
"#,
    )
    .unwrap();

    let settings = SynapticConfig::load_from(&path)
        .unwrap()
        .resolve()
        .unwrap();
    let t0 = Instant::now();
    let mut engine = Engine::from_settings(&settings, t0);
    assert_eq!(engine.next_deadline(), t0 + ms(1000));

    engine.record_interaction(module("calibration"), t0);
    let snapshot = engine.snapshot(t0 + ms(500));
    assert_eq!(snapshot.active_module_id, None);
    assert!(snapshot.is_user_active);
    assert!(!engine.snapshot(t0 + ms(800)).is_user_active);

    assert_eq!(snapshot.emotional_state, EmotionalState::Anxious);
    assert_eq!(snapshot.introspection_depth.value(), 75);
}

#[test]
fn invalid_timing_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[timing]\nphase_tick_ms = 0\n").unwrap();

    let err = SynapticConfig::load_from(&path)
        .unwrap()
        .resolve()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Timing(_)));
}
