//! Terminal worm game.
//!
//! The pieces that make up a session are exported so the loop can be driven
//! without a terminal in tests: [`session::Session`] is fed [`event::Event`]s
//! and reports what changed, [`lifecycle`] turns the end of a session into
//! the farewell text and the high score update.

pub mod config;
pub mod debounce;
pub mod error;
pub mod event;
pub mod game;
pub mod input;
pub mod lifecycle;
pub mod session;
pub mod term;
pub mod worm;

pub type TermInt = u16;
pub type Coords = (u16, u16);
