//! Synaptic CLI - binary entry point and the line-driven session console.
//!
//! # Architecture
//!
//! The CLI sits outside the engine. It loads settings through
//! [`synaptic_config`], spawns the engine task from [`synaptic_engine`], and
//! then multiplexes two inputs:
//!
//! ```text
//! stdin lines ---> parse_command ---> EngineHandle::send ---> snapshot + events
//! engine task ---> broadcast events ---> printed as they happen (phase ticks,
//!                                        activity decay)
//! ```
//!
//! Logs go to a file so the console output stays clean.

mod classifier;
mod console;

use std::{
    env,
    fs::{self, File, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use synaptic_engine::{EngineEvent, EngineHandle, EngineRuntime};

use crate::classifier::{EmotionClassifier, EmotionScan, RandomClassifier};
use crate::console::{
    ConsoleCommand, help_text, parse_command, render_event, render_recap, render_snapshot,
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the console.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.synaptic/logs/synaptic.log
    if let Some(config_path) = synaptic_config::config_path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("synaptic.log"));
    }

    // Fallback: ./.synaptic/logs/synaptic.log
    candidates.push(PathBuf::from(".synaptic").join("logs").join("synaptic.log"));

    candidates
}

const USAGE: &str = "\
usage: synaptic [--seed <n>]

  --seed <n>   seed phase selection and emotion scans (overrides config)
  -h, --help   show this message
";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    seed: Option<u64>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let raw = args.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                    let seed = raw
                        .parse::<u64>()
                        .with_context(|| format!("invalid seed '{raw}'"))?;
                    parsed.seed = Some(seed);
                }
                "-h" | "--help" => parsed.help = true,
                other => bail!("unknown argument '{other}'\n\n{USAGE}"),
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        print!("{USAGE}");
        return Ok(());
    }

    let (mut settings, config_error) = synaptic_config::load_settings();
    if let Some(err) = config_error {
        tracing::warn!(path = ?err.path(), "Using default settings: {err}");
        eprintln!("warning: {err}; using defaults");
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }

    let runtime = EngineRuntime::from_settings(&settings);
    let mut classifier = RandomClassifier::from_seed(settings.seed);
    let result = run_console(&runtime.handle(), &mut classifier).await;
    runtime.shutdown().await;
    result
}

async fn run_console(
    handle: &EngineHandle,
    classifier: &mut impl EmotionClassifier,
) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut events = handle.subscribe_events();

    println!("Synaptic session console. Type 'help' for commands.");
    print!("{}", render_snapshot(&handle.latest()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => {
                        if !execute(handle, classifier, &mut events, command).await? {
                            break;
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            event = events.recv() => match event {
                Ok(event) => println!("{}", render_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Console fell behind engine events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

/// Run one console command. Returns `false` when the console should exit.
async fn execute(
    handle: &EngineHandle,
    classifier: &mut impl EmotionClassifier,
    events: &mut broadcast::Receiver<EngineEvent>,
    command: ConsoleCommand,
) -> Result<bool> {
    match command {
        ConsoleCommand::Engine(command) => {
            let snapshot = handle.send(command).await?;
            print_pending_events(events);
            print!("{}", render_snapshot(&snapshot));
        }
        ConsoleCommand::Scan => {
            let EmotionScan { state, intensity } = classifier.classify();
            println!(
                "scan: {state} at {intensity:.2} ({})",
                state.profile().description
            );
            let snapshot = handle.record_emotion_scan(state, intensity).await?;
            print_pending_events(events);
            print!("{}", render_snapshot(&snapshot));
        }
        ConsoleCommand::Status => {
            let snapshot = handle.snapshot().await?;
            print_pending_events(events);
            print!("{}", render_snapshot(&snapshot));
        }
        ConsoleCommand::Json => {
            let snapshot = handle.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        ConsoleCommand::Recap => {
            let snapshot = handle.snapshot().await?;
            print!("{}", render_recap(&snapshot.recap()));
        }
        ConsoleCommand::Help => print!("{}", help_text()),
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn print_pending_events(events: &mut broadcast::Receiver<EngineEvent>) {
    while let Ok(event) = events.try_recv() {
        println!("{}", render_event(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args> {
        Args::parse(raw.iter().map(ToString::to_string))
    }

    #[test]
    fn parses_seed() {
        assert_eq!(
            args(&["--seed", "42"]).unwrap(),
            Args {
                seed: Some(42),
                help: false,
            }
        );
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(args(&["--seed"]).is_err());
        assert!(args(&["--seed", "many"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn log_file_falls_back_to_working_dir() {
        let candidates = log_file_candidates();
        assert_eq!(
            candidates.last(),
            Some(&PathBuf::from(".synaptic").join("logs").join("synaptic.log"))
        );
    }
}
