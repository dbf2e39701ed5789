//! Bot command parsing and response formatting.
//!
//! # Overview
//!
//! The commands module sits between Matrix messages and the game engine:
//! 1. **Parsing** - Converting a message body into a [`command::Command`]
//! 2. **Execution** - Routing the command to its handler, which plays it on the
//!    [`GameEngine`]
//! 3. **Response** - Describing what to send back: a board to post or edit and
//!    an optional reply, all in Markdown
//!
//! # Flow
//!
//! ```text
//! Matrix Message → Commander::parse() → Command → Commander::parse_command() → CommandResult
//! ```
//!
//! # Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display help information |
//! | `ping` | None | Reply `Pong!` |
//! | `guess` | `[number]` | Start a number guessing game or guess |
//! | `hangman` | `[letter\|word]` | Start a hangman game or guess |
//! | `rps` | `<choice>` | Play a rock paper scissors round |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): messages that are not
//!   commands or are for another bot.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): a known command
//!   with missing arguments, with a message for the user.
//!
//! Game errors (a guess out of range, no game running...) are not parse errors,
//! they come back as a reply in the [`CommandResult`].

mod actions;
pub mod command;
mod commander;
pub mod markdown_response;

pub use crate::commands::commander::Commander;
use crate::games::{GameEngine, GameKind, RandomSource};

/// Runtime context for command execution.
pub struct CommandContext<'a, R: RandomSource> {
    /// Matrix room ID where the command was issued
    pub room_id: String,
    /// Matrix user ID of the command issuer
    pub user_id: String,
    /// Game engine, borrowed for the whole command
    pub engine: &'a mut GameEngine<R, String>,
}

/// Change to apply to the message displaying a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardUpdate {
    /// Send a new board message.
    ///
    /// When `track` is set the event id of the sent message must be attached
    /// to the running game of that kind, so the next turns edit it.
    Post { body: String, track: Option<GameKind> },
    /// Replace the content of an existing board message
    Edit { event_id: String, body: String },
}

/// Result of command execution.
///
/// Handlers never talk to Matrix, the caller sends the board first and the
/// reply after it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Board to post or edit
    pub board: Option<BoardUpdate>,
    /// Markdown reply to the command message
    pub reply: Option<String>,
}

impl CommandResult {
    /// A result made of a single reply.
    pub fn reply(reply: String) -> Self {
        CommandResult {
            board: None,
            reply: Some(reply),
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
