//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::time::{Duration, Instant};

use synaptic_engine::{Engine, EngineSettings, ModuleId, ScriptedDraws};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn module(name: &str) -> ModuleId {
    ModuleId::new(name)
}

/// Engine with default settings and scripted phase draws, created at the returned instant.
pub fn scripted_engine(draws: impl IntoIterator<Item = f64>) -> (Engine, Instant) {
    let t0 = Instant::now();
    let engine = Engine::new(
        &EngineSettings::default(),
        Box::new(ScriptedDraws::new(draws)),
        t0,
    );
    (engine, t0)
}
