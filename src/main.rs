use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use worms::config::{self, Overrides};
use worms::error::AppError;
use worms::game::{Ending, WormGame};
use worms::lifecycle::{farewell, HighScoreFile};

#[derive(Parser)]
#[command(name = "worms", about = "Steer a growing worm around the terminal")]
struct Args {
    /// Config file (default: <config dir>/worms/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds per horizontal step; vertical steps take twice as long
    #[arg(long)]
    step_ms: Option<u64>,

    /// Milliseconds between input polls
    #[arg(long)]
    tick_ms: Option<u64>,

    /// High score file
    #[arg(long)]
    highscore: Option<PathBuf>,

    /// Log verbosity written to the log file
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// The game owns stdout, so logs go to a file. With logging off the file
/// is left untouched.
fn init_logging(level: LogLevel, path: &Path) {
    let level = LevelFilter::from(level);
    if level == LevelFilter::Off {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let file_config = config::load_config(args.config.as_deref())?;
    let overrides = Overrides {
        step_interval_ms: args.step_ms,
        tick_interval_ms: args.tick_ms,
        highscore: args.highscore,
    };
    let config = config::resolve(&file_config, &overrides);

    init_logging(args.log_level, &config.log_path);

    log::info!("Worms starting up: {:?}", config);

    let highscore = HighScoreFile::new(config.highscore_path.clone());
    let mut game = WormGame::new(config)?;
    game.initialize()?;
    let ending = game.play();
    game.restore();

    match ending? {
        Ending::Over { reason, score } => {
            farewell(&mut stdout(), reason, score, &highscore)
                .map_err(AppError::io("couldn't write farewell"))?;
        }
        Ending::Terminated => log::info!("Exiting on termination request"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_off_does_not_touch_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worms.log");
        init_logging(LogLevel::Off, &path);
        assert!(!path.exists());
    }

    #[test]
    fn log_level_defaults_to_info() {
        let args = Args::parse_from(["worms"]);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }
}
