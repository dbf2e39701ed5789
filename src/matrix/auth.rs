//! Matrix login and session restoration.
//!
//! On first start the bot logs in with its password and persists the session
//! in the [`LoginStore`]. On the next starts the session is restored from disk
//! without a new login, so the bot keeps the same device.

use anyhow::Context;
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, login_store::LoginStore};

/// Parses the bot user id from the credentials.
fn bot_user_id(user_credentials: &UserCredentials) -> anyhow::Result<OwnedUserId> {
    OwnedUserId::try_from(user_credentials.user_id.as_str())
        .with_context(|| format!("invalid matrix user id {}", user_credentials.user_id))
}

/// Builds a client on the homeserver of `user_id` using the store database.
async fn build_client(
    user_id: &OwnedUserId,
    user_credentials: &UserCredentials,
    login_store: &LoginStore,
) -> anyhow::Result<Client> {
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(
            login_store.sqlite_path(),
            user_credentials.store_passphrase.as_deref(),
        )
        .build()
        .await?;

    debug!("matrix client created");
    Ok(client)
}

/// Logs in with the password and persists the new session.
async fn login(
    user_credentials: &UserCredentials,
    login_store: &LoginStore,
) -> anyhow::Result<Client> {
    let user_id = bot_user_id(user_credentials)?;
    let client = build_client(&user_id, user_credentials, login_store).await?;

    client
        .matrix_auth()
        .login_username(&user_id, &user_credentials.password)
        .initial_device_display_name("cipher bot")
        .send()
        .await?;

    let user_session = client
        .matrix_auth()
        .session()
        .context("no user session after login")?;
    login_store
        .persist_user_session(&user_session)
        .await
        .context("error persisting user session")?;

    info!("logged in as {}", user_id);
    Ok(client)
}

/// Restores the session found in the login store.
async fn restore(
    user_credentials: &UserCredentials,
    login_store: &LoginStore,
) -> anyhow::Result<Client> {
    info!("restoring matrix session from disk");

    let user_id = bot_user_id(user_credentials)?;
    let user_session = login_store
        .user_session()
        .context("no user session to restore")?;

    if user_session.meta.user_id != user_id {
        anyhow::bail!(
            "stored session belongs to {}, not {}",
            user_session.meta.user_id,
            user_id
        );
    }

    let client = build_client(&user_id, user_credentials, login_store).await?;
    client.restore_session(user_session.clone()).await?;

    info!("matrix session restored successfully");
    Ok(client)
}

/// Returns a logged in client, restoring the stored session when there is one.
pub async fn setup_client(
    user_credentials: &UserCredentials,
    login_store: &LoginStore,
) -> anyhow::Result<Client> {
    info!(
        "setting up matrix client for user {}",
        user_credentials.user_id
    );

    match login_store.has_login() {
        true => restore(user_credentials, login_store).await,
        false => login(user_credentials, login_store).await,
    }
}
