use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::TermInt;

/// Failures that end the program with a non-zero status.
///
/// Game over is not an error; it travels as [`crate::game::Ending`].
#[derive(Debug)]
pub enum AppError {
    /// An OS-level call failed. `context` names the call, perror style.
    Io { context: &'static str, source: io::Error },
    Config(ConfigError),
    FieldTooSmall { width: TermInt, height: TermInt },
}

impl AppError {
    pub fn io(context: &'static str) -> impl FnOnce(io::Error) -> AppError {
        move |source| AppError::Io { context, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io { context, source } => write!(f, "{}: {}", context, source),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::FieldTooSmall { width, height } => {
                write!(f, "terminal is too small to play ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io { source, .. } => Some(source),
            AppError::Config(e) => Some(e),
            AppError::FieldTooSmall { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}
