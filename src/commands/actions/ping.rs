use log::debug;

use crate::commands::{CommandResult, markdown_response::format_pong};

pub fn handle_ping() -> CommandResult {
    debug!("handling ping command");

    CommandResult::reply(format_pong())
}
