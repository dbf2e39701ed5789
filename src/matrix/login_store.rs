//! On-disk persistence of the Matrix login.
//!
//! The data directory contains:
//! - `login`: JSON file with the Matrix user session and the last sync token
//! - `sqlite`: SQLite database used by the Matrix SDK for its own state

use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Login data written to the `login` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLogin {
    /// Matrix user session: user id, device id and tokens
    user_session: matrix::MatrixSession,

    /// Latest sync token, omitted until the first sync
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Reads and writes the Matrix login of the bot.
#[derive(Debug, Clone)]
pub struct LoginStore {
    /// Login found when the store was opened
    login: Option<StoredLogin>,
    /// Path to the sqlite database, `dir_path/sqlite`
    sqlite_path: PathBuf,
    /// Path to the login file, `dir_path/login`
    login_path: PathBuf,
}

impl LoginStore {
    /// Opens the store in `dir_path`, creating the directory if needed.
    ///
    /// A missing or unreadable login file is not an error: the bot logs in
    /// again with its password.
    pub async fn open(dir_path: &str) -> anyhow::Result<LoginStore> {
        debug!("opening login store at {}", dir_path);

        fs::create_dir_all(dir_path)
            .await
            .with_context(|| format!("failed to create data directory {}", dir_path))?;

        let dir = Path::new(dir_path);
        let sqlite_path = dir.join("sqlite");
        let login_path = dir.join("login");

        let login = match LoginStore::read_login(&login_path).await {
            Ok(login) => Some(login),
            Err(e) => {
                debug!("no usable login: {:?}", e);
                None
            }
        };

        Ok(LoginStore {
            login,
            sqlite_path,
            login_path,
        })
    }

    async fn read_login(login_path: &Path) -> anyhow::Result<StoredLogin> {
        if !fs::try_exists(login_path).await.unwrap_or_default() {
            anyhow::bail!("login file does not exist");
        }

        let data = fs::read_to_string(login_path).await?;
        let login: StoredLogin = serde_json::from_str(&data)?;
        Ok(login)
    }

    pub fn has_login(&self) -> bool {
        self.login.is_some()
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn user_session(&self) -> Option<&matrix::MatrixSession> {
        self.login.as_ref().map(|login| &login.user_session)
    }

    pub fn sync_token(&self) -> Option<String> {
        self.login.as_ref().and_then(|login| login.sync_token.clone())
    }

    /// Writes a fresh login, without sync token.
    pub async fn persist_user_session(
        &self,
        user_session: &matrix::MatrixSession,
    ) -> anyhow::Result<()> {
        trace!("persist user session");

        let login = StoredLogin {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.login_path, serde_json::to_string(&login)?).await?;

        Ok(())
    }

    /// Updates the sync token of the login file.
    pub async fn persist_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut login = LoginStore::read_login(&self.login_path).await?;
        login.sync_token = Some(sync_token);
        fs::write(&self.login_path, serde_json::to_string(&login)?).await?;

        Ok(())
    }
}
