//! Command action handlers.
//!
//! Each handler receives what it needs from the
//! [`CommandContext`](crate::commands::CommandContext) and returns a
//! [`CommandResult`](crate::commands::CommandResult).
//!
//! - [`handle_help`] - Display help information
//! - [`handle_ping`] - Liveness check
//! - [`handle_play`] - Start or play any of the games

mod help;
mod ping;
mod play;

pub use crate::commands::actions::{help::handle_help, ping::handle_ping, play::handle_play};
