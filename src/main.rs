//! Cipher - A Matrix bot running chat minigames.
//!
//! # Overview
//!
//! Cipher runs three minigames in Matrix rooms:
//!
//! - **Number guessing**: guess the number the bot is thinking, with higher/lower hints
//! - **Hangman**: find the word letter by letter before the figure is hanged
//! - **Rock paper scissors**: a single round against the bot
//!
//! Number guessing and hangman games are shared by the whole room: anybody can
//! guess, and the game board is a single message edited after every turn.
//!
//! # Configuration
//!
//! ```yaml
//! matrix:
//!   user_id: "@cipher:matrix.org"
//!   password: "your-password"
//! games:
//!   prefix: "!"
//!   max_number: 100
//! ```
//!
//! Any value can be overridden with a `CIPHER_` environment variable:
//!
//! ```bash
//! export CIPHER_MATRIX__PASSWORD="your-password"
//! export CIPHER_GAMES__MAX_ATTEMPTS=10
//! ```
//!
//! # Usage
//!
//! ```bash
//! cipher --config config.yaml --data ./cipher-data
//! ```
//!
//! # Bot Commands
//!
//! - `!guess [number]` - Start a number guessing game, or guess
//! - `!hangman [letter|word]` - Start a hangman game, or guess
//! - `!rps <rock|paper|scissors>` - Play a round of rock paper scissors
//! - `!ping` - Liveness check
//! - `!help` - Display help information
//!
//! # Architecture
//!
//! - [`games`] - Game rules, boards, session store and engine, independent of Matrix
//! - [`commands`] - Command parsing and execution, Markdown responses
//! - [`matrix`] - Matrix login, sync and messaging
//! - [`bot`] - Wiring of Matrix messages to the engine
//! - [`config`] - YAML configuration with environment variable overrides
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod games;
mod matrix;

/// Command-line arguments for the Cipher bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain:
    /// - `login` - Matrix session (access token, device id) and sync token
    /// - `sqlite` - Matrix SDK state store
    ///
    /// The access token allows impersonation of the bot, restrict access to
    /// this directory.
    #[arg(short, long)]
    data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting cipher {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;

    info!("cipher stopped");
}
