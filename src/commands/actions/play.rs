//! Game command handler.
//!
//! Shared by `guess`, `hangman` and `rps`: the input goes to the game engine
//! and the resulting [`Turn`] is turned into a board update and an optional
//! reply.
//!
//! | turn                     | board                           | reply           |
//! |--------------------------|---------------------------------|-----------------|
//! | game started             | posted, tracked                 | none            |
//! | game goes on             | edited (posted if not tracked)  | none            |
//! | game over                | edited (posted if not tracked)  | announcement    |
//! | rock paper scissors      | posted                          | none            |
//! | game error               | untouched                       | error message   |

use log::debug;

use crate::{
    commands::{
        BoardUpdate, CommandContext, CommandResult,
        markdown_response::{format_announcement, format_board, format_game_error},
    },
    games::{GameKind, RandomSource, Turn},
};

/// Plays `input` on the game of `kind` running in the context room.
pub fn handle_play<R: RandomSource>(
    context: &mut CommandContext<R>,
    kind: GameKind,
    input: Option<&str>,
    prefix: char,
) -> CommandResult {
    debug!("handling {} command from {}", kind.command(), context.user_id);

    let turn = match context
        .engine
        .handle_input(&context.room_id, kind, &context.user_id, input)
    {
        Ok(turn) => turn,
        Err(e) => {
            debug!("{} command rejected: {}", kind.command(), e);
            return CommandResult::reply(format_game_error(&e, prefix));
        }
    };

    turn_result(turn, &context.user_id)
}

fn turn_result(turn: Turn<String>, player: &str) -> CommandResult {
    let body = format_board(&turn.board);
    let is_over = turn.is_over();

    let board = match turn.board_handle {
        Some(event_id) => BoardUpdate::Edit { event_id, body },
        None => BoardUpdate::Post {
            body,
            // A finished game is gone from the engine, there is nothing to attach to
            track: (!is_over).then_some(turn.kind),
        },
    };

    let reply = match (turn.outcome, turn.secret) {
        (Some(outcome), Some(secret)) => format_announcement(turn.kind, outcome, &secret, player),
        _ => None,
    };

    CommandResult {
        board: Some(board),
        reply,
    }
}
