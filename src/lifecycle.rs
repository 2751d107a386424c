//! End of a session: the farewell text and the persisted high score.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

/// Reads of the high score file stop after this many bytes.
const READ_LIMIT: u64 = 255;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuitReason {
    HitWall,
    HitSelf,
    UserQuit,
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HighScoreOutcome {
    NewHigh,
    Remains(u32),
}

/// The best score across sessions, kept as bare decimal digits in a file.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored score. A missing or unreadable file, or one that does not
    /// start with a number, counts as 0.
    pub fn read(&self) -> u32 {
        let mut buf = Vec::new();
        let res = File::open(&self.path).and_then(|f| f.take(READ_LIMIT).read_to_end(&mut buf));

        match res {
            Ok(_) => parse_score(&buf),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to read high score from {}: {}", self.path.display(), e);
                }
                0
            }
        }
    }

    /// Replaces the file's contents with `score`. Failures are only logged.
    pub fn write(&self, score: u32) {
        if let Err(e) = fs::write(&self.path, score.to_string()) {
            warn!("Failed to save high score to {}: {}", self.path.display(), e);
        }
    }

    /// Compares `score` with the stored one and saves it if strictly higher.
    pub fn settle(&self, score: u32) -> HighScoreOutcome {
        let high = self.read();
        if score > high {
            info!("New high score {} (was {})", score, high);
            self.write(score);
            HighScoreOutcome::NewHigh
        } else {
            HighScoreOutcome::Remains(high)
        }
    }
}

/// Leading integer of `buf`, like `%d`: optional whitespace and `+`, then
/// digits. Anything else, a negative number or an overflow gives 0.
pub fn parse_score(buf: &[u8]) -> u32 {
    let text = String::from_utf8_lossy(buf);
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits: &str = &text[..text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len())];

    digits.parse().unwrap_or(0)
}

/// Prints the farewell for a finished session and settles the high score.
pub fn farewell<W: Write>(
    out: &mut W,
    reason: QuitReason,
    score: u32,
    highscore: &HighScoreFile,
) -> io::Result<HighScoreOutcome> {
    match reason {
        QuitReason::HitWall => {
            write!(out, "\nYou hit a wall!\n")?;
            writeln!(out, "Your score is {}", score)?;
        }
        QuitReason::HitSelf => {
            write!(out, "\nYou ran into yourself!\n")?;
            writeln!(out, "Your score is {}", score)?;
        }
        QuitReason::UserQuit | QuitReason::BoardFull => {
            writeln!(out, "Your score is {}", score)?;
            writeln!(out)?;
        }
    }

    let outcome = highscore.settle(score);
    match outcome {
        HighScoreOutcome::NewHigh => writeln!(out, "You got a new high score!")?,
        HighScoreOutcome::Remains(high) => writeln!(out, "The high score remains {}!", high)?,
    }
    writeln!(out, "Goodbye!")?;
    out.flush()?;

    Ok(outcome)
}
