//! Matrix protocol integration for the bot.
//!
//! - **Login**: password login on first start, session restored from the
//!   data directory afterwards (`auth` and `login_store` submodules)
//! - **Sync**: auto-join on invite and text message forwarding (`sync` submodule)
//! - **Messaging**: Markdown messages, in place edits and replies ([`MatrixClient`])

mod auth;
mod client;
mod login_store;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Passphrase encrypting the local SQLite store, unencrypted when `None`
    pub store_passphrase: Option<String>,
}

/// A text message received in a joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub body: String,
    pub room_id: String,
    pub sender_id: String,
    pub event_id: String,
}
