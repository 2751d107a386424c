//! # Game Session
//!
//! All mutable game state in one place, advanced only through
//! [`Session::handle`]:
//!
//! ```text
//! Session
//! ├── worm: Worm           // body cells and travel direction
//! ├── food: Coords         // the cell the worm is after
//! ├── score: u32           // food eaten so far
//! ├── paused: bool         // P toggles; ticks then only keep time
//! ├── turned: bool         // a key changed direction since the last tick
//! └── clock: FrameClock    // when the worm last moved
//! ```
//!
//! No I/O happens here. The loop in [`crate::game`] renders whatever the
//! returned [`Flow`] reports.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::ResolvedConfig;
use crate::debounce::FrameClock;
use crate::event::Event;
use crate::input::{command_for, Command};
use crate::lifecycle::QuitReason;
use crate::worm::{Direction, MoveResult, Worm};
use crate::{Coords, TermInt};

/// What one worm step changed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub new_head: Coords,
    pub old_head: Coords,
    pub old_tail: Option<Coords>,
    /// Where new food was placed, when the worm just ate.
    pub food: Option<Coords>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<Advance>),
    Over(QuitReason),
    Terminate,
}

/// Gameplay knobs that do not depend on the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    pub step_interval: Duration,
    pub initial_length: u16,
    pub growth: u32,
}

impl From<&ResolvedConfig> for Rules {
    fn from(config: &ResolvedConfig) -> Self {
        Rules {
            step_interval: config.step_interval,
            initial_length: config.initial_length,
            growth: config.growth,
        }
    }
}

pub struct Session {
    worm: Worm,
    food: Coords,
    score: u32,
    paused: bool,
    turned: bool,
    clock: FrameClock,
    max_x: TermInt,
    max_y: TermInt,
    rules: Rules,
    rng: StdRng,
}

impl Session {
    /// A session on a field whose playable cells are `1..=max_x` by
    /// `1..=max_y`. The worm starts in the middle heading right.
    pub fn new(max_x: TermInt, max_y: TermInt, rules: Rules) -> Self {
        Self::with_rng(max_x, max_y, rules, StdRng::from_entropy())
    }

    pub fn with_seed(max_x: TermInt, max_y: TermInt, rules: Rules, seed: u64) -> Self {
        Self::with_rng(max_x, max_y, rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_x: TermInt, max_y: TermInt, rules: Rules, rng: StdRng) -> Self {
        let max_x = max_x.max(1);
        let max_y = max_y.max(1);
        let center = ((max_x + 1) / 2, (max_y + 1) / 2);
        let length = rules.initial_length.min(center.0).max(1);
        let worm = Worm::new(center, length, Direction::Right);

        let mut session = Session {
            worm,
            food: (0, 0),
            score: 0,
            paused: false,
            turned: false,
            clock: FrameClock::new(),
            max_x,
            max_y,
            rules,
            rng,
        };
        // A field too small to hold any food is refused before a session starts
        session.food = session.free_cell().unwrap_or(center);
        session
    }

    pub fn worm(&self) -> &Worm {
        &self.worm
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_frame(&self) -> Option<Instant> {
        self.clock.last_frame()
    }

    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Input(keys) => {
                for key in keys.iter() {
                    match command_for(key) {
                        Some(Command::Turn(dir)) => {
                            if self.worm.change_direction(dir) {
                                self.turned = true;
                            }
                        }
                        Some(Command::TogglePause) => {
                            self.paused = !self.paused;
                            info!("Game {}", if self.paused { "paused" } else { "resumed" });
                        }
                        Some(Command::Quit) => return Flow::Over(QuitReason::UserQuit),
                        None => {}
                    }
                }
                Flow::Continue(None)
            }
            Event::Tick(now) => self.tick(now),
            Event::Terminate => Flow::Terminate,
        }
    }

    fn tick(&mut self, now: Instant) -> Flow {
        // A turn only counts for the tick it arrived on
        let turned = std::mem::take(&mut self.turned);

        if self.paused {
            self.clock.record(now);
            return Flow::Continue(None);
        }

        if !self.clock.admits(now, self.worm.direction(), turned, self.rules.step_interval) {
            return Flow::Continue(None);
        }
        self.clock.record(now);

        match self.worm.move_step(self.max_x, self.max_y) {
            MoveResult::HitWall => Flow::Over(QuitReason::HitWall),
            MoveResult::HitSelf => Flow::Over(QuitReason::HitSelf),
            MoveResult::Moved { new_head, old_head, old_tail } => {
                let mut food = None;

                if new_head == self.food {
                    self.score += 1;
                    self.worm.grow(self.rules.growth);
                    debug!("Ate food at {:?}, score {}", new_head, self.score);

                    match self.free_cell() {
                        Some(cell) => {
                            self.food = cell;
                            food = Some(cell);
                        }
                        None => return Flow::Over(QuitReason::BoardFull),
                    }
                }

                Flow::Continue(Some(Advance { new_head, old_head, old_tail, food }))
            }
        }
    }

    fn free_cell(&mut self) -> Option<Coords> {
        let choices: Vec<Coords> = (1..=self.max_y)
            .flat_map(|y| (1..=self.max_x).map(move |x| (x, y)))
            .filter(|pos| !self.worm.contains(*pos))
            .collect();

        choices.choose(&mut self.rng).copied()
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: Coords) {
        self.food = pos;
    }
}
