//! The game session sum type.

use crate::games::{
    Board, GameError, GameKind, Hangman, NumberGuessing, Outcome, RandomSource, RockPaperScissors,
};

/// One in-progress minigame.
///
/// Every variant follows the same contract: [`GameSession::play`] consumes a
/// player input and returns an [`Outcome`], [`GameSession::is_active`] turns
/// `false` for good once a terminal outcome is reached and
/// [`GameSession::render`] describes the current state.
#[derive(Debug, Clone)]
pub enum GameSession {
    NumberGuessing(NumberGuessing),
    Hangman(Hangman),
    RockPaperScissors(RockPaperScissors),
}

impl GameSession {
    pub fn kind(&self) -> GameKind {
        match self {
            GameSession::NumberGuessing(_) => GameKind::NumberGuessing,
            GameSession::Hangman(_) => GameKind::Hangman,
            GameSession::RockPaperScissors(_) => GameKind::RockPaperScissors,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            GameSession::NumberGuessing(game) => game.is_active(),
            GameSession::Hangman(game) => game.is_active(),
            GameSession::RockPaperScissors(game) => game.is_active(),
        }
    }

    /// Turns played so far.
    pub fn attempts(&self) -> u32 {
        match self {
            GameSession::NumberGuessing(game) => game.attempts(),
            GameSession::Hangman(game) => game.attempts(),
            GameSession::RockPaperScissors(game) => game.attempts(),
        }
    }

    /// Attempt limit, only number guessing can have one.
    #[cfg(test)]
    pub fn max_attempts(&self) -> Option<u32> {
        match self {
            GameSession::NumberGuessing(game) => game.max_attempts(),
            GameSession::Hangman(_) | GameSession::RockPaperScissors(_) => None,
        }
    }

    /// Accepted inputs in play order.
    #[cfg(test)]
    pub fn history(&self) -> Vec<String> {
        match self {
            GameSession::NumberGuessing(game) => {
                game.history().iter().map(|guess| guess.to_string()).collect()
            }
            GameSession::Hangman(game) => game.history().to_vec(),
            GameSession::RockPaperScissors(game) => match game.bot_choice() {
                Some(_) => vec![game.player_choice().name().to_owned()],
                None => vec![],
            },
        }
    }

    /// Hidden value revealed once the session is over: the number or the word.
    pub fn secret(&self) -> Option<String> {
        if self.is_active() {
            return None;
        }

        match self {
            GameSession::NumberGuessing(game) => Some(game.target().to_string()),
            GameSession::Hangman(game) => Some(game.word()),
            GameSession::RockPaperScissors(game) => game.bot_choice().map(|hand| hand.to_string()),
        }
    }

    /// Plays one turn.
    ///
    /// The rock paper scissors round ignores `input` since the choice was made
    /// when the round was built.
    pub fn play<R: RandomSource>(
        &mut self,
        player: &str,
        input: &str,
        rng: &mut R,
    ) -> Result<Outcome, GameError> {
        match self {
            GameSession::NumberGuessing(game) => game.play(player, input),
            GameSession::Hangman(game) => game.play(input),
            GameSession::RockPaperScissors(game) => game.play(rng).map(RockPaperScissors::outcome),
        }
    }

    pub fn render(&self) -> Board {
        match self {
            GameSession::NumberGuessing(game) => game.render(),
            GameSession::Hangman(game) => game.render(),
            GameSession::RockPaperScissors(game) => game.render(),
        }
    }
}
