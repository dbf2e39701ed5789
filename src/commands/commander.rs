//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the entry point for processing
//! bot commands. It parses raw message bodies and routes commands to their
//! handlers.
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → parse_command() → CommandResult
//! ```

use command_parser::Parser;

use crate::{
    commands::{
        CommandContext, CommandParseError, CommandResult,
        actions::{handle_help, handle_ping, handle_play},
        command::{Command, format_command_error},
    },
    games::{GameKind, RandomSource},
};

/// Command orchestrator for parsing and executing bot commands.
///
/// Commands start with the configured prefix (`!` by default). Messages
/// without it, and commands the bot does not know, are silently ignored
/// ([`CommandParseError::NotForBot`]).
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
    /// Character starting every command
    prefix: char,
}

impl Commander {
    /// Creates a new Commander recognizing commands starting with `prefix`.
    pub fn new(prefix: char) -> Self {
        let parser = Parser::new(prefix, '-');
        Commander { parser, prefix }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed command
    /// * `Err(CommandParseError::NotForBot)` - Not a command, or not one of ours
    /// * `Err(CommandParseError::InvalidCommand)` - Known command with invalid arguments
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        match Command::parse(&self.parser, body) {
            Ok(command) => Ok(command),
            // Return silently if the command is not for the bot
            // Otherwise, send an error message
            Err(error) => match format_command_error(error, self.prefix) {
                Some(message) => Err(CommandParseError::InvalidCommand(message)),
                None => Err(CommandParseError::NotForBot),
            },
        }
    }

    /// Executes a parsed command and returns what to send back.
    ///
    /// - [`Command::Help`] → [`handle_help`]
    /// - [`Command::Ping`] → [`handle_ping`]
    /// - [`Command::Guess`], [`Command::Hangman`] and [`Command::Rps`] → [`handle_play`]
    pub fn parse_command<R: RandomSource>(
        &self,
        command: &Command,
        context: &mut CommandContext<R>,
    ) -> CommandResult {
        match command {
            Command::Help => handle_help(self.prefix),
            Command::Ping => handle_ping(),
            Command::Guess(input) => handle_play(
                context,
                GameKind::NumberGuessing,
                input.as_deref(),
                self.prefix,
            ),
            Command::Hangman(input) => {
                handle_play(context, GameKind::Hangman, input.as_deref(), self.prefix)
            }
            Command::Rps(choice) => handle_play(
                context,
                GameKind::RockPaperScissors,
                Some(choice.as_str()),
                self.prefix,
            ),
        }
    }
}
