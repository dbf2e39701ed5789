//! Failures returned by the game engine.
//!
//! Every failure is recoverable: the player fixes their input and tries again.
//! The engine never turns these into chat messages itself, see
//! `commands::markdown_response` for the user-facing wording.

use std::fmt;

use thiserror::Error;

use crate::games::GameKind;

/// What a game accepts as a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// An integer in `[0, max_number]`
    Number { max_number: u32 },
    /// Letters, words being separated by spaces
    Letters,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Number { max_number } => {
                write!(f, "an integer between 0 and {}", max_number)
            }
            Expected::Letters => write!(f, "a letter or a word"),
        }
    }
}

/// Errors produced while starting a game or playing a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The guess has the wrong shape for the game: not an integer in
    /// `[0, max_number]`, or not made of letters.
    ///
    /// The session is left untouched and the guess is not counted as an attempt.
    #[error("guess must be {0}")]
    InvalidInput(Expected),
    /// The letter or word was already guessed in this hangman game.
    #[error("{0:?} was already guessed")]
    AlreadyGuessed(String),
    /// A guess was sent but no game of this kind runs in the channel.
    #[error("no {0} game is running in this channel")]
    NoActiveGame(GameKind),
    /// A start was requested while a game of this kind already runs in the channel.
    #[error("a {0} game is already running in this channel")]
    GameAlreadyRunning(GameKind),
    /// The rock paper scissors choice is not rock, paper or scissors.
    #[error("{0:?} is not rock, paper or scissors")]
    InvalidChoice(String),
    /// The game already reached a terminal outcome.
    #[error("the game is over")]
    GameOver,
}

/// Invalid game settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("max_number must be greater than 0")]
    ZeroMaxNumber,
    #[error("max_attempts must be greater than 0")]
    ZeroMaxAttempts,
    #[error("hangman_words must contain at least one word")]
    NoWords,
}
