//! Configuration loading for Synaptic.
//!
//! The config file lives at `~/.synaptic/config.toml` (or wherever
//! `SYNAPTIC_CONFIG` points). Every field is optional; a missing file is not an
//! error. Raw structs stay private to this crate and are resolved into the
//! validated [`EngineSettings`] at the parse boundary.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use synaptic_types::{
    DEFAULT_HIGHLIGHT_WINDOW, DEFAULT_PHASE_TICK, DEFAULT_QUIET_WINDOW, EmotionalState,
    EngineSettings, Percent, SettingsError, Timing, ValidationError,
};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SYNAPTIC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [timing] section: {0}")]
    Timing(#[from] SettingsError),
    #[error("invalid [session] section: {0}")]
    Session(#[from] ValidationError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Timing(_) | ConfigError::Session(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynapticConfig {
    timing: Option<TimingConfig>,
    session: Option<SessionConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingConfig {
    phase_tick_ms: Option<u64>,
    highlight_ms: Option<u64>,
    quiet_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionConfig {
    initial_emotion: Option<String>,
    introspection_depth: Option<i64>,
    seed: Option<u64>,
}

impl SynapticConfig {
    /// Load the config from its default location.
    ///
    /// Returns `Ok(None)` when no path can be determined or the file does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Resolve into validated engine settings, filling gaps with defaults.
    pub fn resolve(&self) -> Result<EngineSettings, ConfigError> {
        let timing = match &self.timing {
            Some(raw) => Timing::new(
                millis_or(raw.phase_tick_ms, DEFAULT_PHASE_TICK),
                millis_or(raw.highlight_ms, DEFAULT_HIGHLIGHT_WINDOW),
                millis_or(raw.quiet_ms, DEFAULT_QUIET_WINDOW),
            )?,
            None => Timing::default(),
        };

        let mut settings = EngineSettings {
            timing,
            ..EngineSettings::default()
        };

        if let Some(session) = &self.session {
            if let Some(name) = &session.initial_emotion {
                settings.initial_emotion = name.parse::<EmotionalState>()?;
            }
            if let Some(depth) = session.introspection_depth {
                settings.introspection_depth = Percent::clamped(depth);
            }
            settings.seed = session.seed;
        }

        Ok(settings)
    }
}

fn millis_or(value: Option<u64>, default: Duration) -> Duration {
    value.map_or(default, Duration::from_millis)
}

/// Resolve the config path: `SYNAPTIC_CONFIG` first, then `~/.synaptic/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(raw) = env::var(CONFIG_PATH_ENV)
        && !raw.trim().is_empty()
    {
        return Some(PathBuf::from(raw));
    }
    dirs::home_dir().map(|home| home.join(".synaptic").join("config.toml"))
}

/// Load and resolve settings, falling back to defaults on any error.
///
/// Errors are returned alongside the settings so the caller can surface them
/// once logging is up.
#[must_use]
pub fn load_settings() -> (EngineSettings, Option<ConfigError>) {
    match SynapticConfig::load().and_then(|cfg| cfg.unwrap_or_default().resolve()) {
        Ok(settings) => (settings, None),
        Err(err) => (EngineSettings::default(), Some(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(raw: &str) -> SynapticConfig {
        toml::from_str(raw).expect("valid toml")
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = parse("").resolve().unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let settings = parse(
            r#"
            [timing]
            phase_tick_ms = 1000
            highlight_ms = 500

            [session]
            initial_emotion = "Anxious"
            introspection_depth = 80
            seed = 7
            "#,
        )
        .resolve()
        .unwrap();

        assert_eq!(settings.timing.phase_tick(), Duration::from_millis(1000));
        assert_eq!(settings.timing.highlight(), Duration::from_millis(500));
        assert_eq!(settings.timing.quiet(), DEFAULT_QUIET_WINDOW);
        assert_eq!(settings.initial_emotion, EmotionalState::Anxious);
        assert_eq!(settings.introspection_depth.value(), 80);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn depth_is_clamped() {
        let settings = parse("[session]\nintrospection_depth = 250\n")
            .resolve()
            .unwrap();
        assert_eq!(settings.introspection_depth, Percent::MAX);
    }

    #[test]
    fn highlight_longer_than_quiet_is_rejected() {
        let err = parse("[timing]\nhighlight_ms = 5000\nquiet_ms = 3000\n")
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Timing(SettingsError::HighlightOutlastsQuiet { .. })
        ));
        assert!(err.path().is_none());
    }

    #[test]
    fn unknown_emotion_is_rejected() {
        let err = parse("[session]\ninitial_emotion = \"elated\"\n")
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Session(ValidationError::UnknownEmotion(_))
        ));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timing]\ntick = 3").unwrap();
        let err = SynapticConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), Some(file.path()));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session]\nseed = 99\n").unwrap();
        let settings = SynapticConfig::load_from(&path).unwrap().resolve().unwrap();
        assert_eq!(settings.seed, Some(99));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SynapticConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
