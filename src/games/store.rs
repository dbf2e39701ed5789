//! Per-channel storage of running sessions.

use std::collections::HashMap;

use crate::games::{GameError, GameKind, GameSession};

/// Identifies a session: the channel it runs in and the kind of game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// Opaque channel identifier (a Matrix room id for the bot)
    pub channel: String,
    pub kind: GameKind,
}

impl SessionKey {
    pub fn new(channel: &str, kind: GameKind) -> Self {
        SessionKey {
            channel: channel.to_owned(),
            kind,
        }
    }
}

/// A stored session and the handle of the message displaying it.
///
/// `H` is opaque to the store, the bot uses the event id of the board message.
#[derive(Debug, Clone)]
pub struct StoredGame<H> {
    pub session: GameSession,
    pub board: Option<H>,
}

/// Owns every running session, at most one per channel and game kind.
///
/// Removing an entry is the only way a session ends its life.
#[derive(Debug)]
pub struct SessionStore<H> {
    games: HashMap<SessionKey, StoredGame<H>>,
}

impl<H> Default for SessionStore<H> {
    fn default() -> Self {
        SessionStore {
            games: HashMap::new(),
        }
    }
}

impl<H> SessionStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.games.contains_key(key)
    }

    #[cfg(test)]
    pub fn get(&self, key: &SessionKey) -> Option<&StoredGame<H>> {
        self.games.get(key)
    }

    pub fn get_mut(&mut self, key: &SessionKey) -> Option<&mut StoredGame<H>> {
        self.games.get_mut(key)
    }

    /// Stores a new session.
    ///
    /// A second session for the same key is rejected and the running one is
    /// kept untouched.
    pub fn insert(&mut self, key: SessionKey, session: GameSession) -> Result<(), GameError> {
        if self.games.contains_key(&key) {
            return Err(GameError::GameAlreadyRunning(key.kind));
        }

        self.games.insert(
            key,
            StoredGame {
                session,
                board: None,
            },
        );
        Ok(())
    }

    /// Records the handle of the message displaying a session.
    ///
    /// Returns `false` when the session is gone, e.g. it ended before the
    /// board was sent.
    pub fn attach_board(&mut self, key: &SessionKey, board: H) -> bool {
        match self.games.get_mut(key) {
            Some(stored) => {
                stored.board = Some(board);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &SessionKey) -> Option<StoredGame<H>> {
        self.games.remove(key)
    }

    /// Number of running sessions.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Drops every session, used on shutdown.
    pub fn clear(&mut self) {
        self.games.clear();
    }
}
