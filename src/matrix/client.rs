//! Matrix client wrapper for bot messaging and synchronization.
//!
//! [`MatrixClient`] wraps the Matrix SDK client. It sends Markdown messages,
//! edits them in place and replies to commands.

use log::{debug, error, info};
use matrix_sdk::{
    Client, Room,
    ruma::{
        EventId, OwnedEventId, RoomId, UserId,
        events::room::message::{
            AddMentions, ForwardThread, ReplacementMetadata, ReplyMetadata,
            RoomMessageEventContent,
        },
    },
};

use crate::matrix::{
    IncomingMessage, UserCredentials, auth::setup_client, login_store::LoginStore,
    sync::MatrixSync,
};

/// Display name set on the bot account at startup.
const DISPLAY_NAME: &str = "Cipher";

/// High-level Matrix client for bot messaging operations.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Logs in (or restores the previous session) and prepares the sync loop.
    ///
    /// # Arguments
    ///
    /// * `user_credentials` - Account of the bot
    /// * `data_path` - Directory holding the login file and the SQLite database
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be used or if the login or
    /// session restoration fails.
    pub async fn new(
        user_credentials: &UserCredentials,
        data_path: &str,
    ) -> Result<Self, anyhow::Error> {
        let login_store = LoginStore::open(data_path).await?;
        let client = setup_client(user_credentials, &login_store).await?;

        if let Err(e) = client.account().set_display_name(Some(DISPLAY_NAME)).await {
            error!("failed to set display name: {:?}", e);
        }

        let matrix_sync = MatrixSync::new(&client, &login_store);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// `on_message` is called for each text message of a joined room. Never
    /// returns under normal operation.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the sync loop.
    pub async fn sync<F>(&self, on_message: F) -> Result<(), anyhow::Error>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        self.matrix_sync.sync(on_message).await?;
        info!("matrix sync ended");

        Ok(())
    }

    /// Sends a Markdown message and returns its event id.
    ///
    /// Returns `None` if the message could not be sent.
    pub async fn send_markdown(&self, room_id: &str, body: &str) -> Option<String> {
        let content = RoomMessageEventContent::text_markdown(body);
        self.send(room_id, content).await.map(|event_id| event_id.to_string())
    }

    /// Replaces the content of a message previously sent by the bot.
    pub async fn edit_markdown(&self, room_id: &str, event_id: &str, body: &str) {
        let event_id = match EventId::parse(event_id) {
            Ok(event_id) => event_id,
            Err(e) => {
                error!("invalid event id {}: {:?}", event_id, e);
                return;
            }
        };

        let content = RoomMessageEventContent::text_markdown(body)
            .make_replacement(ReplacementMetadata::new(event_id, None));

        self.send(room_id, content).await;
    }

    /// Sends a Markdown reply to a message.
    ///
    /// # Arguments
    ///
    /// * `room_id` - The Matrix room ID where the reply should be sent
    /// * `sender_id` - The user ID of the original message sender
    /// * `event_id` - The event ID of the message being replied to
    /// * `body` - The reply content
    pub async fn send_reply(&self, room_id: &str, sender_id: &str, event_id: &str, body: &str) {
        let (sender, event) = match (UserId::parse(sender_id), EventId::parse(event_id)) {
            (Ok(sender), Ok(event)) => (sender, event),
            _ => {
                error!("cannot reply to {} from {}", event_id, sender_id);
                return;
            }
        };

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(room_id, content).await;
    }

    fn room(&self, room_id: &str) -> Option<Room> {
        let room_id = match RoomId::parse(room_id) {
            Ok(room_id) => room_id,
            Err(e) => {
                error!("invalid room id {}: {:?}", room_id, e);
                return None;
            }
        };

        self.client.get_room(&room_id)
    }

    async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> Option<OwnedEventId> {
        let Some(room) = self.room(room_id) else {
            error!("unknown room {}", room_id);
            return None;
        };

        match room.send(content).await {
            Ok(result) => {
                debug!("message sent to {}", room_id);
                Some(result.event_id)
            }
            Err(e) => {
                error!("failed to send message: {:?}", e);
                None
            }
        }
    }
}
