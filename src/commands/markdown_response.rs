//! Markdown response formatters for bot commands.
//!
//! Turns boards, game errors and end of game announcements into Markdown
//! ready to be sent to a Matrix room.

use crate::games::{Board, BoardField, Expected, GameError, GameKind, Outcome};

/// Formats the help message listing every command.
pub fn format_help(prefix: char) -> String {
    format!(
        "Commands:\n\
        - `{p}guess`: start a number guessing game\n\
        - `{p}guess <number>`: guess the number\n\
        - `{p}hangman`: start a hangman game\n\
        - `{p}hangman <letter|word>`: guess a letter or the whole word\n\
        - `{p}rps <rock|paper|scissors>`: play a round of rock paper scissors against me\n\
        - `{p}ping`: check that I am alive\n\
        - `{p}help`: show this help message\n\n\
        One number guessing and one hangman game can run at the same time in each room, everybody in the room can play.",
        p = prefix
    )
}

pub fn format_pong() -> String {
    "Pong!".to_owned()
}

/// Formats the usage of `rps` when no choice was given.
pub fn format_missing_choice(prefix: char) -> String {
    format!("Missing choice. Usage: `{}rps <rock|paper|scissors>`", prefix)
}

/// Formats a game error for the player who caused it.
pub fn format_game_error(error: &GameError, prefix: char) -> String {
    match error {
        GameError::InvalidInput(Expected::Number { max_number }) => format!(
            "Please guess a number between *0* and *{}*, (otherwise I get headaches :<)",
            max_number
        ),
        GameError::InvalidInput(Expected::Letters) => {
            "Please guess a single letter or a whole word, letters only!".to_owned()
        }
        GameError::AlreadyGuessed(_) => "You already guessed that!".to_owned(),
        GameError::NoActiveGame(kind) => format!(
            "No active game here! Start a new game with `{}{}`.",
            prefix,
            kind.command()
        ),
        GameError::GameAlreadyRunning(_) => "Game already running!".to_owned(),
        GameError::InvalidChoice(_) => {
            "Please select **rock**, **paper** or **scissors**".to_owned()
        }
        GameError::GameOver => "This game is already over.".to_owned(),
    }
}

/// Formats the announcement sent when a game ends.
///
/// Returns `None` for outcomes without announcement: a game going on, or a
/// rock paper scissors round whose board already shows the result.
pub fn format_announcement(
    kind: GameKind,
    outcome: Outcome,
    secret: &str,
    player: &str,
) -> Option<String> {
    let subject = match kind {
        GameKind::NumberGuessing => "number",
        GameKind::Hangman => "word",
        GameKind::RockPaperScissors => return None,
    };

    match outcome {
        Outcome::Won => Some(format!(
            "🎉 You guessed it! The {} was **{}**. Solved by {}",
            subject, secret, player
        )),
        Outcome::Lost => Some(format!("💀 You lost! The {} was **{}**.", subject, secret)),
        Outcome::Exhausted => Some(format!(
            "⌛ Out of attempts! The {} was **{}**.",
            subject, secret
        )),
        Outcome::Continue | Outcome::Tied => None,
    }
}

fn format_field(field: &BoardField) -> String {
    match field.monospace {
        true => format!("**{}**: `{}`", field.name, field.value),
        false => format!("**{}**: {}", field.name, field.value),
    }
}

/// Formats a board.
///
/// Consecutive inline fields share a line, block fields get a paragraph of
/// their own and the drawing is put in a code block.
pub fn format_board(board: &Board) -> String {
    let title = match board.color {
        Some(color) => format!("<font color=\"#{:06X}\">{}</font>", color, board.title),
        None => board.title.clone(),
    };
    let mut paragraphs = vec![format!("### {}", title)];

    if let Some(description) = &board.description {
        paragraphs.push(description.clone());
    }

    if let Some(drawing) = &board.drawing {
        paragraphs.push(format!("```\n{}\n```", drawing));
    }

    let mut inline_fields: Vec<String> = Vec::new();
    for field in &board.fields {
        if field.inline {
            inline_fields.push(format_field(field));
            continue;
        }

        if !inline_fields.is_empty() {
            paragraphs.push(inline_fields.join(" · "));
            inline_fields.clear();
        }
        paragraphs.push(format_field(field));
    }
    if !inline_fields.is_empty() {
        paragraphs.push(inline_fields.join(" · "));
    }

    paragraphs.join("\n\n")
}
