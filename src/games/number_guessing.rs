//! Number guessing game.
//!
//! The bot draws a number in `[0, max_number]` and players take turns guessing
//! it. After every guess the board tells whether the hidden number is higher or
//! lower. Malformed or out of range guesses are rejected without consuming an
//! attempt.

use log::debug;

use crate::games::{Board, Expected, GameError, Outcome, RandomSource};

/// Hint given after a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// The hidden number is greater than the guess
    Higher,
    /// The hidden number is smaller than the guess
    Lower,
    /// The guess is the hidden number
    Correct,
}

impl Hint {
    /// Compares a guess with the hidden number.
    pub fn compare(guess: u32, target: u32) -> Self {
        if guess == target {
            Hint::Correct
        } else if target > guess {
            Hint::Higher
        } else {
            Hint::Lower
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Hint::Higher => "⬆️",
            Hint::Lower => "⬇️",
            Hint::Correct => "🎉 Correct!",
        }
    }
}

/// State of a number guessing session.
#[derive(Debug, Clone)]
pub struct NumberGuessing {
    /// Hidden number, fixed for the whole session
    target: u32,
    /// Upper bound (inclusive) of the hidden number
    max_number: u32,
    /// Attempts allowed before the session ends, unlimited when `None`
    max_attempts: Option<u32>,
    /// Valid guesses played so far
    attempts: u32,
    /// Valid guesses in play order
    history: Vec<u32>,
    /// Hint of the last guess, `None` before the first guess
    last_hint: Option<Hint>,
    /// Player who sent the last guess
    last_player: Option<String>,
    active: bool,
}

impl NumberGuessing {
    /// Starts a game with a target drawn uniformly from `[0, max_number]`.
    pub fn new<R: RandomSource>(rng: &mut R, max_number: u32, max_attempts: Option<u32>) -> Self {
        let target = rng.draw(max_number).min(max_number);
        debug!("new number guessing game between 0 and {}", max_number);

        NumberGuessing {
            target,
            max_number,
            max_attempts,
            attempts: 0,
            history: Vec::new(),
            last_hint: None,
            last_player: None,
            active: true,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    #[cfg(test)]
    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    #[cfg(test)]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[cfg(test)]
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    #[cfg(test)]
    pub fn last_hint(&self) -> Option<Hint> {
        self.last_hint
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Parses a raw guess, accepting only integers in `[0, max_number]`.
    pub fn parse_guess(&self, input: &str) -> Result<u32, GameError> {
        let invalid = GameError::InvalidInput(Expected::Number {
            max_number: self.max_number,
        });

        match input.trim().parse::<i64>() {
            Ok(guess) if (0..=i64::from(self.max_number)).contains(&guess) => Ok(guess as u32),
            _ => Err(invalid),
        }
    }

    /// Plays one guess.
    ///
    /// The guess is validated first; a rejected guess leaves the session
    /// untouched. A correct guess ends the session with [`Outcome::Won`],
    /// reaching `max_attempts` without it ends with [`Outcome::Exhausted`].
    pub fn play(&mut self, player: &str, input: &str) -> Result<Outcome, GameError> {
        if !self.active {
            return Err(GameError::GameOver);
        }

        let guess = self.parse_guess(input)?;

        self.attempts += 1;
        self.history.push(guess);
        self.last_player = Some(player.to_owned());

        let hint = Hint::compare(guess, self.target);
        self.last_hint = Some(hint);
        debug!("guess {} -> {:?} after {} attempts", guess, hint, self.attempts);

        if hint == Hint::Correct {
            self.active = false;
            return Ok(Outcome::Won);
        }

        if let Some(max_attempts) = self.max_attempts
            && self.attempts >= max_attempts
        {
            self.active = false;
            return Ok(Outcome::Exhausted);
        }

        Ok(Outcome::Continue)
    }

    pub fn render(&self) -> Board {
        let attempts = match self.max_attempts {
            Some(max_attempts) => format!("{}/{}", self.attempts, max_attempts),
            None => self.attempts.to_string(),
        };

        let history = match self.history.is_empty() {
            true => "None".to_owned(),
            false => self
                .history
                .iter()
                .map(|guess| guess.to_string())
                .collect::<Vec<String>>()
                .join(", "),
        };

        let hint = match self.last_hint {
            Some(hint) => hint.icon().to_owned(),
            None => format!("🧠 guess the number between 0 and {}", self.max_number),
        };

        let color = match self.last_hint {
            Some(Hint::Correct) => 0x00FF00,
            _ => 0xFF0000,
        };

        let mut board = Board::new("🎲 Guess the number")
            .color(color)
            .description("Guess the number I'm thinking")
            .inline_field("Attempts", attempts)
            .inline_field("History", history)
            .inline_field("Hint", hint);

        if let Some(player) = &self.last_player {
            board.push_field("Last guess by", player.as_str(), true);
        }

        board
    }
}
