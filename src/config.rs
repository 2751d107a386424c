//! # Configuration
//!
//! Override hierarchy: defaults → config file → env vars → CLI flags.
//!
//! The config file is `<config dir>/worms/config.toml` unless `--config`
//! points somewhere else. A missing file just means defaults; a malformed
//! one is fatal.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WormsConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GameConfig {
    pub step_interval_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub initial_length: Option<u16>,
    pub growth: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FilesConfig {
    pub highscore: Option<PathBuf>,
    pub log: Option<PathBuf>,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default)]
pub struct Overrides {
    pub step_interval_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub highscore: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_STEP_INTERVAL_MS: u64 = 100;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_INITIAL_LENGTH: u16 = 5;
pub const DEFAULT_GROWTH: u32 = 3;
pub const DEFAULT_HIGHSCORE_PATH: &str = "./highscore.txt";
pub const DEFAULT_LOG_PATH: &str = "worms.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub step_interval: Duration,
    pub tick_interval: Duration,
    pub initial_length: u16,
    pub growth: u32,
    pub highscore_path: PathBuf,
    pub log_path: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => {
                write!(f, "config I/O error ({}): {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "config parse error ({}): {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `<config dir>/worms/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("worms").join("config.toml"))
}

/// Loads `explicit` if given, otherwise the default location.
///
/// A missing default file yields `WormsConfig::default()`. A missing
/// explicit file is an error: the user asked for it by name.
pub fn load_config(explicit: Option<&Path>) -> Result<WormsConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            _ => {
                info!("No config file found, using defaults");
                return Ok(WormsConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
    let config = parse_config(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<WormsConfig, toml::de::Error> {
    toml::from_str(contents)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WormsConfig, cli: &Overrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with<F>(config: &WormsConfig, cli: &Overrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Step: CLI → env → config → default
    let step_ms = cli
        .step_interval_ms
        .or_else(|| env("WORMS_STEP_MS").and_then(|v| v.trim().parse().ok()))
        .or(config.game.step_interval_ms)
        .unwrap_or(DEFAULT_STEP_INTERVAL_MS);

    // Tick: CLI → config → default
    let tick_ms = cli
        .tick_interval_ms
        .or(config.game.tick_interval_ms)
        .unwrap_or(DEFAULT_TICK_INTERVAL_MS);

    // High score file: CLI → env → config → default
    let highscore_path = cli
        .highscore
        .clone()
        .or_else(|| env("WORMS_HIGHSCORE").map(PathBuf::from))
        .or_else(|| config.files.highscore.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HIGHSCORE_PATH));

    ResolvedConfig {
        step_interval: Duration::from_millis(step_ms.max(1)),
        tick_interval: Duration::from_millis(tick_ms.max(1)),
        initial_length: config.game.initial_length.unwrap_or(DEFAULT_INITIAL_LENGTH).max(1),
        growth: config.game.growth.unwrap_or(DEFAULT_GROWTH),
        highscore_path,
        log_path: config
            .files
            .log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&WormsConfig::default(), &Overrides::default(), no_env);
        assert_eq!(resolved.step_interval, Duration::from_millis(DEFAULT_STEP_INTERVAL_MS));
        assert_eq!(resolved.tick_interval, Duration::from_millis(DEFAULT_TICK_INTERVAL_MS));
        assert_eq!(resolved.initial_length, DEFAULT_INITIAL_LENGTH);
        assert_eq!(resolved.growth, DEFAULT_GROWTH);
        assert_eq!(resolved.highscore_path, PathBuf::from("./highscore.txt"));
        assert_eq!(resolved.log_path, PathBuf::from("worms.log"));
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = WormsConfig {
            game: GameConfig {
                step_interval_ms: Some(80),
                tick_interval_ms: Some(20),
                initial_length: Some(3),
                growth: Some(1),
            },
            files: FilesConfig {
                highscore: Some(PathBuf::from("/tmp/hs.txt")),
                log: Some(PathBuf::from("/tmp/worms.log")),
            },
        };
        let resolved = resolve_with(&config, &Overrides::default(), no_env);
        assert_eq!(resolved.step_interval, Duration::from_millis(80));
        assert_eq!(resolved.tick_interval, Duration::from_millis(20));
        assert_eq!(resolved.initial_length, 3);
        assert_eq!(resolved.growth, 1);
        assert_eq!(resolved.highscore_path, PathBuf::from("/tmp/hs.txt"));
        assert_eq!(resolved.log_path, PathBuf::from("/tmp/worms.log"));
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let config = WormsConfig {
            game: GameConfig { step_interval_ms: Some(80), ..Default::default() },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "WORMS_STEP_MS" => Some("120".to_string()),
            "WORMS_HIGHSCORE" => Some("env.txt".to_string()),
            _ => None,
        };

        let resolved = resolve_with(&config, &Overrides::default(), env);
        assert_eq!(resolved.step_interval, Duration::from_millis(120));
        assert_eq!(resolved.highscore_path, PathBuf::from("env.txt"));

        let cli = Overrides {
            step_interval_ms: Some(60),
            highscore: Some(PathBuf::from("cli.txt")),
            ..Default::default()
        };
        let resolved = resolve_with(&config, &cli, env);
        assert_eq!(resolved.step_interval, Duration::from_millis(60));
        assert_eq!(resolved.highscore_path, PathBuf::from("cli.txt"));
    }

    #[test]
    fn test_bad_env_value_falls_through() {
        let env = |key: &str| if key == "WORMS_STEP_MS" { Some("fast".to_string()) } else { None };
        let resolved = resolve_with(&WormsConfig::default(), &Overrides::default(), env);
        assert_eq!(resolved.step_interval, Duration::from_millis(DEFAULT_STEP_INTERVAL_MS));
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let cli = Overrides {
            step_interval_ms: Some(0),
            tick_interval_ms: Some(0),
            ..Default::default()
        };
        let resolved = resolve_with(&WormsConfig::default(), &cli, no_env);
        assert_eq!(resolved.step_interval, Duration::from_millis(1));
        assert_eq!(resolved.tick_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config = parse_config("[game]\nstep_interval_ms = 70\n").unwrap();
        assert_eq!(config.game.step_interval_ms, Some(70));
        assert!(config.game.growth.is_none());
        assert!(config.files.highscore.is_none());
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(parse_config("[game]\nstep_interval_ms = \"soon\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_explicit_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worms.toml");
        fs::write(&path, "[files]\nhighscore = \"scores.txt\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.files.highscore, Some(PathBuf::from("scores.txt")));
    }
}
