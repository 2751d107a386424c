//! Movement cadence.
//!
//! The worm advances on a tick only when enough time has passed since the
//! last frame it moved on. Vertical travel needs twice the step interval,
//! horizontal travel one: a terminal cell is roughly twice as tall as it is
//! wide, so this keeps both axes at the same on-screen speed. A tick on which
//! the player actually turned is never held back.

use std::time::{Duration, Instant};

use crate::worm::{Axis, Direction};

/// Minimum time between two advances when travelling along `direction`.
pub fn threshold(direction: Direction, step: Duration) -> Duration {
    match direction.axis() {
        Axis::Vertical => step * 2,
        Axis::Horizontal => step,
    }
}

/// Whether an advance `elapsed` after the previous frame comes too early.
/// Compared in whole milliseconds.
pub fn suppresses(direction: Direction, elapsed: Duration, step: Duration) -> bool {
    elapsed.as_millis() < threshold(direction, step).as_millis()
}

#[derive(Debug, Default)]
pub struct FrameClock {
    last_frame: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock { last_frame: None }
    }

    pub fn last_frame(&self) -> Option<Instant> {
        self.last_frame
    }

    /// Decides whether the tick at `now` may advance the worm.
    ///
    /// The first frame ever only sets the baseline, so it is always admitted
    /// without looking at the clock.
    pub fn admits(&self, now: Instant, direction: Direction, turned: bool, step: Duration) -> bool {
        let last = match self.last_frame {
            Some(last) => last,
            None => return true,
        };

        if turned {
            return true;
        }

        !suppresses(direction, now.saturating_duration_since(last), step)
    }

    pub fn record(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}
