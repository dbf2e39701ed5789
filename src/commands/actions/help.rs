//! Help command handler.
//!
//! Lists every command with the configured prefix. Stateless.

use log::debug;

use crate::commands::{CommandResult, markdown_response::format_help};

/// Returns formatted help information about available commands.
pub fn handle_help(prefix: char) -> CommandResult {
    debug!("handling help command");

    CommandResult::reply(format_help(prefix))
}
