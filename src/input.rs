use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::worm::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Quit,
}

/// Maps a key press to a game command. Everything else is ignored.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Turn(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Turn(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Turn(Direction::Right),
        KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
        KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Ctrl+C. Raw mode keeps the terminal from turning it into SIGINT, so it
/// is treated the same way as the signal.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// A non-blocking source of key events.
pub trait KeySource {
    /// Everything queued since the last call, oldest first. Never blocks.
    fn pending(&mut self) -> io::Result<Vec<KeyEvent>>;
}

/// The real keyboard, read through crossterm's event queue.
pub struct Keyboard;

impl KeySource for Keyboard {
    fn pending(&mut self) -> io::Result<Vec<KeyEvent>> {
        let mut keys = vec![];

        while event::poll(Duration::ZERO)? {
            if let Event::Key(ev) = event::read()? {
                log::debug!("Key event: {:?} with modifiers {:?}", ev.code, ev.modifiers);
                keys.push(ev);
            }
        }

        Ok(keys)
    }
}
