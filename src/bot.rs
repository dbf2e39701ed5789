//! Bot module wiring Matrix messages to the game engine.
//!
//! # Command Processing Flow
//!
//! ```text
//! Matrix Message → Parse Command → Play on the engine (locked) → Post or edit board → Reply
//! ```
//!
//! Commands of a room are handled one at a time: the room lock is taken before
//! the command is played and released after the last Matrix call, so board
//! edits reach the homeserver in turn order. The engine lock is only held while
//! the command is played, rooms do not wait for each other's network calls.

use std::{collections::HashMap, sync::Arc};

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Args,
    commands::{
        BoardUpdate, CommandContext, CommandParseError, CommandResult, Commander, command::Command,
    },
    config::Config,
    games::{GameEngine, RandomSource, ThreadRandom},
    matrix::{IncomingMessage, MatrixClient, UserCredentials},
};

type Engine = GameEngine<ThreadRandom, String>;

/// One lock per room, serializing the handling of its commands.
#[derive(Default)]
struct RoomLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    /// Waits for the previous commands of `room_id` to be fully handled.
    async fn lock(&self, room_id: &str) -> OwnedMutexGuard<()> {
        let room_lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(room_id.to_owned()).or_default())
        };

        room_lock.lock_owned().await
    }
}

/// Plays a command on the shared engine, holding the engine lock meanwhile.
async fn play_command<R: RandomSource>(
    engine: &Mutex<GameEngine<R, String>>,
    commander: &Commander,
    command: &Command,
    room_id: &str,
    sender_id: &str,
) -> CommandResult {
    let mut engine = engine.lock().await;
    let mut command_context = CommandContext {
        room_id: room_id.to_owned(),
        user_id: sender_id.to_owned(),
        engine: &mut *engine,
    };

    commander.parse_command(command, &mut command_context)
}

/// Context for processing a Matrix message.
struct MessageContext {
    /// The received message
    message: IncomingMessage,
    /// Thread-safe reference to the Matrix client
    matrix_client: Arc<MatrixClient>,
    /// Game engine shared by every room
    engine: Arc<Mutex<Engine>>,
    /// Thread-safe reference to the command handler
    commander: Arc<Commander>,
    /// Per-room ordering of command handling
    room_locks: Arc<RoomLocks>,
}

/// Main bot structure.
///
/// All shared state is wrapped in `Arc` to be shared with the task spawned for
/// each message. The engine is behind a `Mutex` since every command may start,
/// play or end a game.
pub struct Bot {
    /// Matrix client for sending and receiving messages
    matrix_client: Arc<MatrixClient>,

    /// Running games of every room
    engine: Arc<Mutex<Engine>>,

    /// Command parser and executor, stateless
    commander: Arc<Commander>,

    /// Per-room ordering of command handling
    room_locks: Arc<RoomLocks>,
}

impl Bot {
    /// Creates a new Bot instance from configuration and command line arguments.
    ///
    /// Logs in to Matrix, or restores the previous session stored in the data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the game settings are invalid or if the Matrix
    /// login fails.
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        let settings = config.games.settings()?;
        let engine = Arc::new(Mutex::new(GameEngine::new(settings, ThreadRandom::new())));

        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    store_passphrase: config.matrix.store_passphrase,
                },
                &args.data,
            )
            .await?,
        );

        let commander = Arc::new(Commander::new(config.games.prefix));

        Ok(Bot {
            matrix_client,
            engine,
            commander,
            room_locks: Arc::new(RoomLocks::default()),
        })
    }

    /// Processes messages until the Matrix sync ends or the process is
    /// interrupted, then drops every running game.
    pub async fn start(self) {
        let matrix_client = Arc::clone(&self.matrix_client);
        let engine = Arc::clone(&self.engine);
        let commander = Arc::clone(&self.commander);
        let room_locks = Arc::clone(&self.room_locks);

        let on_message = move |message: IncomingMessage| {
            let ctx = MessageContext {
                message,
                matrix_client: Arc::clone(&matrix_client),
                engine: Arc::clone(&engine),
                commander: Arc::clone(&commander),
                room_locks: Arc::clone(&room_locks),
            };
            Self::handle_matrix_message(ctx)
        };

        tokio::select! {
            result = self.matrix_client.sync(on_message) => {
                if let Err(e) = result {
                    error!("matrix sync failed: {:?}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => info!("interrupted, shutting down"),
        }

        self.engine.lock().await.clear();
    }

    /// Handles an incoming Matrix message in its own task.
    fn handle_matrix_message(ctx: MessageContext) {
        tokio::spawn(async move {
            let IncomingMessage {
                body,
                room_id,
                sender_id,
                event_id,
            } = &ctx.message;

            // Parse body to extract command
            let command = match ctx.commander.parse(body) {
                Ok(command) => command,
                Err(e) => match e {
                    // Return silently if the command is not for the bot
                    CommandParseError::NotForBot => return,
                    // Send error message if the command is invalid
                    CommandParseError::InvalidCommand(message) => {
                        ctx.matrix_client
                            .send_reply(room_id, sender_id, event_id, &message)
                            .await;
                        return;
                    }
                },
            };
            debug!("{} sent {:?} in {}", sender_id, command, room_id);

            // Held until the board and the reply are sent
            let _room_guard = ctx.room_locks.lock(room_id).await;

            let command_result =
                play_command(&*ctx.engine, &ctx.commander, &command, room_id, sender_id).await;

            Self::send_result(&ctx, command_result).await;
        });
    }

    /// Sends the board first, then the reply.
    async fn send_result(ctx: &MessageContext, command_result: CommandResult) {
        let IncomingMessage {
            room_id,
            sender_id,
            event_id,
            ..
        } = &ctx.message;

        match command_result.board {
            Some(BoardUpdate::Post { body, track }) => {
                let board_event_id = ctx.matrix_client.send_markdown(room_id, &body).await;

                if let (Some(kind), Some(board_event_id)) = (track, board_event_id) {
                    // The game may already be over if a guess was played while the board was sent
                    if !ctx
                        .engine
                        .lock()
                        .await
                        .attach_board(room_id, kind, board_event_id)
                    {
                        warn!("{} game in {} ended before its board was sent", kind, room_id);
                    }
                }
            }
            Some(BoardUpdate::Edit {
                event_id: board_event_id,
                body,
            }) => {
                ctx.matrix_client
                    .edit_markdown(room_id, &board_event_id, &body)
                    .await;
            }
            None => {}
        }

        if let Some(reply) = command_result.reply {
            ctx.matrix_client
                .send_reply(room_id, sender_id, event_id, &reply)
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{sync::oneshot, time::sleep};

    use super::*;
    use crate::games::{GameKind, GameSettings, MockRandomSource};

    const ROOM: &str = "!room:example.com";

    fn create_engine() -> Arc<Mutex<GameEngine<MockRandomSource, String>>> {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(37u32);

        let words = vec!["hi".to_owned()];
        let mut engine = GameEngine::new(GameSettings::new(100, None, &words).unwrap(), rng);
        engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        engine.attach_board(ROOM, GameKind::NumberGuessing, "$board".to_owned());

        Arc::new(Mutex::new(engine))
    }

    fn edited_body(result: CommandResult) -> String {
        match result.board {
            Some(BoardUpdate::Edit { event_id, body }) => {
                assert_eq!(event_id, "$board");
                body
            }
            other => panic!("Expected an edit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_room_lock_keeps_board_edits_in_turn_order() {
        let engine = create_engine();
        let commander = Arc::new(Commander::new('!'));
        let room_locks = Arc::new(RoomLocks::default());
        let sent: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let (locked_tx, locked_rx) = oneshot::channel();

        // First guess, whose edit is slow to send
        let first = {
            let (engine, commander) = (Arc::clone(&engine), Arc::clone(&commander));
            let (room_locks, sent) = (Arc::clone(&room_locks), Arc::clone(&sent));
            tokio::spawn(async move {
                let _room_guard = room_locks.lock(ROOM).await;
                let _ = locked_tx.send(());

                let command = Command::Guess(Some("50".to_owned()));
                let result =
                    play_command(&*engine, &commander, &command, ROOM, "@alice:example.com").await;
                sleep(Duration::from_millis(50)).await;
                sent.lock().await.push(edited_body(result));
            })
        };

        // Winning guess, sent as soon as it is played
        let second = {
            let (engine, commander) = (Arc::clone(&engine), Arc::clone(&commander));
            let (room_locks, sent) = (Arc::clone(&room_locks), Arc::clone(&sent));
            tokio::spawn(async move {
                locked_rx.await.unwrap();
                let _room_guard = room_locks.lock(ROOM).await;

                let command = Command::Guess(Some("37".to_owned()));
                let result =
                    play_command(&*engine, &commander, &command, ROOM, "@bob:example.com").await;
                sent.lock().await.push(edited_body(result));
            })
        };

        first.await.unwrap();
        second.await.unwrap();

        let sent = sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("**Hint**: ⬇️"));
        assert!(sent[1].contains("**🏆 Solved by**: @bob:example.com"));
    }

    #[tokio::test]
    async fn test_rooms_do_not_wait_for_each_other() {
        let room_locks = RoomLocks::default();

        let _first_room = room_locks.lock("!a:example.com").await;
        let second_room =
            tokio::time::timeout(Duration::from_secs(1), room_locks.lock("!b:example.com")).await;

        assert!(second_room.is_ok());
    }

    #[tokio::test]
    async fn test_same_room_waits_for_release() {
        let room_locks = RoomLocks::default();

        let first = room_locks.lock(ROOM).await;
        let blocked = tokio::time::timeout(Duration::from_millis(20), room_locks.lock(ROOM)).await;
        assert!(blocked.is_err());

        drop(first);
        let released = tokio::time::timeout(Duration::from_secs(1), room_locks.lock(ROOM)).await;
        assert!(released.is_ok());
    }
}
