//! Command parsing.
//!
//! Converts a Matrix message body into a [`Command`]. Only the command names
//! known by the bot are accepted, anything else is ignored so the bot can share
//! a room (and a prefix) with other bots.

use command_parser::Parser;
use log::debug;

use crate::commands::markdown_response::format_missing_choice;

/// A parsed bot command.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Liveness check
    Ping,
    /// Start a number guessing game, or guess a number when an argument is given
    Guess(Option<String>),
    /// Start a hangman game, or guess a letter or a word when an argument is given
    Hangman(Option<String>),
    /// Play a rock paper scissors round with the given choice
    Rps(String),
}

/// Errors that can occur during command parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The message could not be parsed as a command
    UnableToParse,
    /// The command name is not one of ours
    Unknown,
    /// `rps` was sent without a choice
    MissingChoice,
}

impl Command {
    /// Parses a message body into a command.
    ///
    /// Arguments are joined with a single space, so `!hangman latte  machiato`
    /// guesses `latte machiato`.
    pub fn parse(parser: &Parser, body: &str) -> Result<Self, CommandParsingError> {
        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let padded = body.to_string() + " dummy";

        // This is normal to fail if the message is not a command
        let command = match parser.parse(&padded) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        debug!("parsing command: {:?}", command);

        // The parser reads words starting with `-` as options, negative guesses
        // must reach the game, so arguments come from the raw body
        let argument = Self::argument(body);

        match command.name.to_lowercase().as_str() {
            "help" => Ok(Command::Help),
            "ping" => Ok(Command::Ping),
            "guess" => Ok(Command::Guess(argument)),
            "hangman" => Ok(Command::Hangman(argument)),
            "rps" => argument
                .map(Command::Rps)
                .ok_or(CommandParsingError::MissingChoice),
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// Words following the command name, `None` when there is none.
    fn argument(body: &str) -> Option<String> {
        let words: Vec<&str> = body.split_whitespace().skip(1).collect();

        match words.is_empty() {
            true => None,
            false => Some(words.join(" ")),
        }
    }
}

/// Formats a command error into a user-friendly message.
///
/// Returns `None` for messages the bot must stay silent about.
pub fn format_command_error(error: CommandParsingError, prefix: char) -> Option<String> {
    match error {
        CommandParsingError::MissingChoice => Some(format_missing_choice(prefix)),
        CommandParsingError::UnableToParse | CommandParsingError::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_parser() -> Parser {
        Parser::new('!', '-')
    }

    #[test]
    fn test_parse_help_command() {
        let parser = create_parser();
        assert_eq!(Command::parse(&parser, "!help"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_ping_command() {
        let parser = create_parser();
        assert_eq!(Command::parse(&parser, "!ping"), Ok(Command::Ping));
    }

    #[test]
    fn test_parse_guess_without_argument() {
        let parser = create_parser();
        assert_eq!(Command::parse(&parser, "!guess"), Ok(Command::Guess(None)));
    }

    #[test]
    fn test_parse_guess_with_argument() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!guess 42"),
            Ok(Command::Guess(Some("42".to_owned())))
        );
    }

    #[test]
    fn test_parse_negative_guess_is_kept() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!guess -1"),
            Ok(Command::Guess(Some("-1".to_owned())))
        );
    }

    #[test]
    fn test_parse_hangman_multi_word_guess() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!hangman latte   machiato"),
            Ok(Command::Hangman(Some("latte machiato".to_owned())))
        );
    }

    #[test]
    fn test_parse_rps_command() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!rps Rock"),
            Ok(Command::Rps("Rock".to_owned()))
        );
    }

    #[test]
    fn test_parse_rps_without_choice() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!rps"),
            Err(CommandParsingError::MissingChoice)
        );
    }

    #[test]
    fn test_parse_custom_prefix() {
        let parser = Parser::new('?', '-');
        assert_eq!(Command::parse(&parser, "?ping"), Ok(Command::Ping));
    }

    #[test]
    fn test_parse_unknown_command() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!other_bot help"),
            Err(CommandParsingError::Unknown)
        );
    }

    #[test]
    fn test_parse_unable_to_parse() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "This is not a command"),
            Err(CommandParsingError::UnableToParse)
        );
    }

    #[test]
    fn test_format_command_error_missing_choice() {
        let result = format_command_error(CommandParsingError::MissingChoice, '!');
        assert!(result.unwrap().contains("!rps"));
    }

    #[test]
    fn test_format_command_error_is_silent() {
        assert!(format_command_error(CommandParsingError::Unknown, '!').is_none());
        assert!(format_command_error(CommandParsingError::UnableToParse, '!').is_none());
    }
}
