//! Line commands and plain-text rendering for the session console.

use thiserror::Error;

use synaptic_engine::{
    Calibration, EmotionalState, EngineCommand, EngineEvent, EngineSnapshot, ModuleId,
    SessionRecap, SessionStage, ValidationError,
};
use synaptic_types::parse_percent;

const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Engine(EngineCommand),
    /// Ask the classifier for a reading and apply it.
    Scan,
    Status,
    Json,
    Recap,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let argument = |usage: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(usage))
        } else {
            Ok(rest)
        }
    };
    let dial = |usage: &'static str| -> Result<i64, CommandError> {
        let percent = parse_percent(argument(usage)?)?;
        Ok(i64::from(percent.value()))
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "interact" | "i" => {
            let module = ModuleId::new(argument("interact <module>")?);
            ConsoleCommand::Engine(EngineCommand::Interact(module))
        }
        "emotion" | "e" => {
            let state = argument("emotion <name>")?.parse::<EmotionalState>()?;
            ConsoleCommand::Engine(EngineCommand::SetEmotion(state))
        }
        "depth" => ConsoleCommand::Engine(EngineCommand::SetIntrospectionDepth(dial(
            "depth <0-100>",
        )?)),
        "load" => ConsoleCommand::Engine(EngineCommand::SetCognitiveLoad(dial("load <0-100>")?)),
        "sensitivity" => ConsoleCommand::Engine(EngineCommand::SetEmotionalSensitivity(dial(
            "sensitivity <0-100>",
        )?)),
        "next" | "n" => ConsoleCommand::Engine(EngineCommand::AdvanceStage),
        "back" | "b" => ConsoleCommand::Engine(EngineCommand::RetreatStage),
        "finish" => ConsoleCommand::Engine(EngineCommand::FinishSession),
        "new" => ConsoleCommand::Engine(EngineCommand::StartNewSession),
        "scan" => ConsoleCommand::Scan,
        "status" | "s" => ConsoleCommand::Status,
        "json" => ConsoleCommand::Json,
        "recap" => ConsoleCommand::Recap,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

pub fn help_text() -> String {
    let rows = [
        ("interact <module>", "record an interaction (mirror, stream, ...)"),
        ("emotion <name>", "set the emotional state"),
        ("scan", "classify the emotional state"),
        ("depth <n>", "set introspection depth (0-100)"),
        ("load <n>", "set cognitive load (0-100)"),
        ("sensitivity <n>", "set emotional sensitivity (0-100)"),
        ("next / back", "move between session stages"),
        ("finish", "complete the session from the last stage"),
        ("new", "start a new session"),
        ("status / json", "show the current snapshot"),
        ("recap", "summarize the session"),
        ("quit", "leave"),
    ];
    rows.iter()
        .map(|(usage, what)| format!("  {usage:<20}{what}\n"))
        .collect()
}

fn row(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label:<LABEL_WIDTH$}{value}\n"));
}

pub fn render_snapshot(snapshot: &EngineSnapshot) -> String {
    let mut out = String::new();

    let phase = snapshot.phase;
    row(
        &mut out,
        "phase",
        &format!("{phase} ({:.1})", phase.intensity()),
    );

    let emotion = snapshot.emotional_state;
    row(
        &mut out,
        "emotion",
        &format!("{emotion} - {}", emotion.profile().description),
    );
    row(
        &mut out,
        "baseline",
        snapshot.initial_emotional_state.as_str(),
    );

    let activity = match (&snapshot.active_module_id, snapshot.is_user_active) {
        (Some(module), _) => format!("active, highlighting {}", module.as_str().escape_debug()),
        (None, true) => "active".to_string(),
        (None, false) => "idle".to_string(),
    };
    row(&mut out, "activity", &activity);
    row(
        &mut out,
        "interactions",
        &snapshot.interaction_count.to_string(),
    );

    let mut stage = format!(
        "{}/{} {} ({}%)",
        snapshot.stage_index + 1,
        SessionStage::COUNT,
        snapshot.stage,
        snapshot.stage.progress_percent()
    );
    if snapshot.session_finished {
        stage.push_str(", complete");
    }
    row(&mut out, "stage", &stage);

    let calibration = Calibration {
        introspection_depth: snapshot.introspection_depth,
        cognitive_load: snapshot.cognitive_load,
        emotional_sensitivity: snapshot.emotional_sensitivity,
    };
    row(
        &mut out,
        "calibration",
        &format!(
            "depth {}, load {}, sensitivity {}, resonance {}",
            calibration.introspection_depth,
            calibration.cognitive_load,
            calibration.emotional_sensitivity,
            calibration.resonance()
        ),
    );

    let recent = if snapshot.recent_emotions.is_empty() {
        "none".to_string()
    } else {
        snapshot
            .recent_emotions
            .iter()
            .map(|state| state.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    row(&mut out, "recent", &recent);
    out
}

pub fn render_recap(recap: &SessionRecap) -> String {
    let mut out = String::from(if recap.session_finished {
        "Session complete\n"
    } else {
        "Session in progress\n"
    });
    for (label, value) in [
        ("mood shift", recap.mood_shift()),
        ("interactions", recap.interaction_count.to_string()),
        (
            "stages",
            format!("{}/{}", recap.stages_completed, SessionStage::COUNT),
        ),
    ] {
        out.push_str(&format!("  {label:<LABEL_WIDTH$}{value}\n"));
    }
    out
}

pub fn render_event(event: &EngineEvent) -> String {
    format!("  * {}", event.format())
}
