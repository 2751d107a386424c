use log::info;

use crate::config::ResolvedConfig;
use crate::error::AppError;
use crate::event::Scheduler;
use crate::input::Keyboard;
use crate::lifecycle::QuitReason;
use crate::session::{Advance, Flow, Rules, Session};
use crate::term::TermManager;

const WORM_BODY_CHAR: char = '#';
const FOOD_CHAR: char = '*';

const PAUSE_LINES: &[&str] = &["Paused", "P to resume", "Q to quit"];

/// How a game came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Over { reason: QuitReason, score: u32 },
    /// SIGINT, SIGTERM or Ctrl+C: clean up and leave without a score.
    Terminated,
}

pub struct WormGame {
    term: TermManager,
    config: ResolvedConfig,
}

impl WormGame {
    pub fn new(config: ResolvedConfig) -> Result<Self, AppError> {
        Ok(WormGame { term: TermManager::new()?, config })
    }

    pub fn initialize(&mut self) -> Result<(), AppError> {
        self.term.setup().map_err(AppError::io("couldn't set up terminal"))
    }

    /// Puts the terminal back before anything is printed to it.
    pub fn restore(&mut self) {
        self.term.restore();
    }

    pub fn play(&mut self) -> Result<Ending, AppError> {
        let (max_x, max_y) = self.term.field_max();
        let mut session = Session::new(max_x, max_y, Rules::from(&self.config));
        let mut scheduler = Scheduler::new(self.config.tick_interval, Keyboard)
            .with_signals()
            .map_err(AppError::io("couldn't register signal handlers"))?;

        self.draw_field(&session).map_err(AppError::io("couldn't draw"))?;
        info!("Game started on a {}x{} field", max_x, max_y);

        loop {
            let event = scheduler.next_event().map_err(AppError::io("couldn't read input"))?;
            let was_paused = session.is_paused();

            match session.handle(event) {
                Flow::Continue(advance) => {
                    if let Some(adv) = advance {
                        self.draw_advance(&session, &adv)
                            .map_err(AppError::io("couldn't draw"))?;
                    }
                    if session.is_paused() != was_paused {
                        self.toggle_pause_banner(session.is_paused())
                            .map_err(AppError::io("couldn't draw"))?;
                    }
                }
                Flow::Over(reason) => {
                    info!("Game over: {:?}, score {}", reason, session.score());
                    return Ok(Ending::Over { reason, score: session.score() });
                }
                Flow::Terminate => {
                    info!("Terminated with score {}", session.score());
                    return Ok(Ending::Terminated);
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_field(&mut self, session: &Session) -> std::io::Result<()> {
        self.term.clear()?;
        self.term.draw_borders()?;

        let worm = session.worm();
        let last = worm.len() - 1;
        for (i, pos) in worm.body().iter().enumerate() {
            let ch = if i == last {worm.head_char()} else {WORM_BODY_CHAR};
            self.term.print_at(*pos, ch)?;
        }
        self.term.print_at(session.food(), FOOD_CHAR)?;

        self.term.flush()
    }

    fn draw_advance(&mut self, session: &Session, adv: &Advance) -> std::io::Result<()> {
        // Tail first: when the head follows the tail into its cell the head wins
        if let Some(old_tail) = adv.old_tail {
            self.term.print_at(old_tail, ' ')?;
        }
        self.term.print_at(adv.old_head, WORM_BODY_CHAR)?;
        self.term.print_at(adv.new_head, session.worm().head_char())?;

        if let Some(food) = adv.food {
            self.term.print_at(food, FOOD_CHAR)?;
        }

        self.term.flush()
    }

    fn toggle_pause_banner(&mut self, paused: bool) -> std::io::Result<()> {
        if paused {
            self.term.show_message(PAUSE_LINES)
        } else {
            self.term.hide_message()
        }
    }
}
