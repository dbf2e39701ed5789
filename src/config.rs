//! Configuration file structures for the Cipher bot.
//!
//! The configuration is a YAML file with two sections: the Matrix account and
//! the game settings. Every value can be overridden with an environment
//! variable prefixed with `CIPHER_`, nested keys being separated by `__`
//! (e.g. `CIPHER_MATRIX__PASSWORD`).
//!
//! ```yaml
//! matrix:
//!   # Fully qualified Matrix user ID of the bot account
//!   user_id: "@cipher:matrix.org"
//!   password: "secret-password"
//!   # Optional, encrypts the local SQLite store
//!   store_passphrase: "store-passphrase"
//!
//! # Optional section, every field has a default
//! games:
//!   prefix: "!"
//!   max_number: 100
//!   # Attempts allowed in number guessing, unlimited when missing
//!   max_attempts: 10
//!   hangman_words: ["sunny", "espresso", "latte machiato"]
//! ```

use anyhow::{anyhow, bail};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

use crate::games::GameSettings;

/// Prefix of the environment variables overriding the file.
const ENV_PREFIX: &str = "CIPHER_";

/// Words used by hangman when the configuration has none.
const DEFAULT_HANGMAN_WORDS: [&str; 12] = [
    "sunny",
    "veny",
    "moony",
    "buni",
    "marsy",
    "uri",
    "pluty",
    "espresso",
    "matcha",
    "croiffle",
    "latte machiato",
    "americano",
];

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Game settings
    #[serde(default)]
    pub games: Games,
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Matrix ID of the bot account, `@username:homeserver.com`
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for the first login only, the session is then restored from the
    /// data directory.
    pub password: String,

    /// Passphrase encrypting the local SQLite store
    #[serde(default)]
    pub store_passphrase: Option<String>,
}

/// Game settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Games {
    /// Character starting every command
    pub prefix: char,
    /// Upper bound (inclusive) of the number to guess
    pub max_number: u32,
    /// Attempts allowed in number guessing, unlimited when `None`
    pub max_attempts: Option<u32>,
    /// Hangman word list
    pub hangman_words: Vec<String>,
}

impl Default for Games {
    fn default() -> Self {
        Games {
            prefix: '!',
            max_number: 100,
            max_attempts: None,
            hangman_words: DEFAULT_HANGMAN_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
        }
    }
}

impl Games {
    /// Builds the engine settings, lower-casing the words.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out of range setting.
    pub fn settings(&self) -> anyhow::Result<GameSettings> {
        GameSettings::new(self.max_number, self.max_attempts, &self.hangman_words)
            .map_err(|e| anyhow!("games.{}", e))
    }
}

impl Config {
    /// Loads the configuration from a YAML file, with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a required key
    /// is missing or if a value is out of range.
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let config: Config = Figment::new()
            .merge(Yaml::file_exact(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.matrix.user_id.trim().is_empty() {
            bail!("matrix.user_id must not be empty");
        }
        if self.games.prefix.is_whitespace() {
            bail!("games.prefix must not be a whitespace");
        }
        self.games.settings()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn load(file: &NamedTempFile) -> anyhow::Result<Config> {
        Config::load(&file.path().to_string_lossy())
    }

    const MINIMAL: &str = "matrix:\n  user_id: \"@cipher:example.com\"\n  password: \"secret\"\n";

    #[test]
    #[serial]
    fn test_load_minimal_config_uses_defaults() {
        let file = write_config(MINIMAL);
        let config = load(&file).unwrap();

        assert_eq!(config.matrix.user_id, "@cipher:example.com");
        assert_eq!(config.matrix.password, "secret");
        assert!(config.matrix.store_passphrase.is_none());
        assert_eq!(config.games.prefix, '!');
        assert_eq!(config.games.max_number, 100);
        assert_eq!(config.games.max_attempts, None);
        assert_eq!(config.games.hangman_words.len(), DEFAULT_HANGMAN_WORDS.len());
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        let file = write_config(
            "matrix:\n  user_id: \"@cipher:example.com\"\n  password: \"secret\"\n  store_passphrase: \"store\"\n\
             games:\n  prefix: \"?\"\n  max_number: 10\n  max_attempts: 3\n  hangman_words: [\"Sunny\", \"uri\"]\n",
        );
        let config = load(&file).unwrap();

        assert_eq!(config.matrix.store_passphrase.as_deref(), Some("store"));
        assert_eq!(config.games.prefix, '?');
        assert_eq!(config.games.max_number, 10);
        assert_eq!(config.games.max_attempts, Some(3));

        let settings = config.games.settings().unwrap();
        assert_eq!(settings.words(), &["sunny".to_owned(), "uri".to_owned()]);
        assert_eq!(settings.max_attempts(), Some(3));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config(MINIMAL);

        // SAFETY: the test is serialized with every other test touching the environment
        unsafe {
            std::env::set_var("CIPHER_MATRIX__PASSWORD", "from-env");
            std::env::set_var("CIPHER_GAMES__MAX_NUMBER", "50");
        }
        let result = load(&file);
        unsafe {
            std::env::remove_var("CIPHER_MATRIX__PASSWORD");
            std::env::remove_var("CIPHER_GAMES__MAX_NUMBER");
        }

        let config = result.unwrap();
        assert_eq!(config.matrix.password, "from-env");
        assert_eq!(config.games.max_number, 50);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/cipher.yaml").is_err());
    }

    #[test]
    #[serial]
    fn test_missing_password_is_an_error() {
        let file = write_config("matrix:\n  user_id: \"@cipher:example.com\"\n");
        assert!(load(&file).is_err());
    }

    #[test]
    #[serial]
    fn test_zero_max_number_is_rejected() {
        let file = write_config(&format!("{}games:\n  max_number: 0\n", MINIMAL));
        let error = load(&file).unwrap_err();
        assert!(error.to_string().contains("max_number"));
    }

    #[test]
    #[serial]
    fn test_empty_word_list_is_rejected() {
        let file = write_config(&format!("{}games:\n  hangman_words: []\n", MINIMAL));
        let error = load(&file).unwrap_err();
        assert_eq!(error.to_string(), "games.hangman_words must contain at least one word");
    }

    #[test]
    #[serial]
    fn test_blank_words_are_rejected() {
        let file = write_config(&format!("{}games:\n  hangman_words: [\" \", \"\"]\n", MINIMAL));
        let error = load(&file).unwrap_err();
        assert!(error.to_string().contains("hangman_words"));
    }

    #[test]
    #[serial]
    fn test_zero_max_attempts_is_rejected() {
        let file = write_config(&format!("{}games:\n  max_attempts: 0\n", MINIMAL));
        let error = load(&file).unwrap_err();
        assert_eq!(error.to_string(), "games.max_attempts must be greater than 0");
    }
}
