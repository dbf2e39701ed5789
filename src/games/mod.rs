//! Game core, independent of the chat platform.
//!
//! This module holds the three minigames and everything they share:
//!
//! - [`NumberGuessing`] - guess a number drawn in `[0, max_number]`
//! - [`Hangman`] - find a word letter by letter before the figure is hanged
//! - [`RockPaperScissors`] - a single round against the bot
//!
//! Every game renders itself as a [`Board`] and reports the result of a turn as
//! an [`Outcome`]. Running games are kept in a [`SessionStore`], at most one per
//! channel and [`GameKind`]. The [`GameEngine`] ties everything together and is
//! the only type the chat layer talks to.

use std::fmt;

mod board;
mod engine;
mod error;
mod hangman;
mod number_guessing;
pub mod random;
mod rock_paper_scissors;
mod session;
mod store;

pub use board::{Board, BoardField};
pub use engine::{GameEngine, GameSettings, Turn};
pub use error::{Expected, GameError, SettingsError};
pub use hangman::Hangman;
#[cfg(test)]
pub use random::MockRandomSource;
pub use random::{RandomSource, ThreadRandom};
#[cfg(test)]
pub use number_guessing::Hint;
pub use number_guessing::NumberGuessing;
pub use rock_paper_scissors::RockPaperScissors;
pub use session::GameSession;
pub use store::{SessionKey, SessionStore};

/// The kinds of minigame the bot can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    NumberGuessing,
    Hangman,
    RockPaperScissors,
}

impl GameKind {
    /// Name of the chat command driving this game, without prefix.
    pub fn command(self) -> &'static str {
        match self {
            GameKind::NumberGuessing => "guess",
            GameKind::Hangman => "hangman",
            GameKind::RockPaperScissors => "rps",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::NumberGuessing => "number guessing",
            GameKind::Hangman => "hangman",
            GameKind::RockPaperScissors => "rock paper scissors",
        };
        write!(f, "{}", name)
    }
}

/// Result of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game goes on
    Continue,
    /// The player found the answer or won the round
    Won,
    /// The player lost (hanged, or beaten by the bot)
    Lost,
    /// Rock paper scissors round with the same choice on both sides
    Tied,
    /// Number guessing ran out of attempts
    Exhausted,
}

impl Outcome {
    /// Returns `true` when the session is over after this outcome.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}
