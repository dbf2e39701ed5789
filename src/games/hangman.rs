//! Hangman.
//!
//! A word is drawn from the configured list and players guess it one letter
//! (or one full word) at a time. Each wrong guess adds a stage to the gallows;
//! the game is lost when the figure is complete.

use log::debug;

use crate::games::{Board, Expected, GameError, Outcome};

/// Symbol shown for a letter that has not been found yet.
pub const PLACEHOLDER: char = '_';

/// Gallows drawings, from the empty gallows to the fully hanged figure.
pub const STAGES: [&str; 7] = [
    r"   +---+
   |   |
       |
       |
       |
       |
=========",
    r"   +---+
   |   |
   O   |
       |
       |
       |
=========",
    r"   +---+
   |   |
   O   |
   |   |
       |
       |
=========",
    r"   +---+
   |   |
   O   |
  /|   |
       |
       |
=========",
    r"   +---+
   |   |
   O   |
  /|\  |
       |
       |
=========",
    r"   +---+
   |   |
   O   |
  /|\  |
  /    |
       |
=========",
    r"   +---+
   |   |
   O   |
  /|\  |
  / \  |
       |
=========",
];

/// Number of wrong guesses that hangs the player.
pub const MAX_WRONG_GUESSES: usize = STAGES.len() - 1;

/// State of a hangman session.
#[derive(Debug, Clone)]
pub struct Hangman {
    /// Word to find, lower-cased
    word: Vec<char>,
    /// Word as displayed, same length as `word`
    revealed: Vec<char>,
    /// Wrong letters and words in guess order
    wrong_guesses: Vec<String>,
    /// Every accepted guess in order
    history: Vec<String>,
    active: bool,
}

impl Hangman {
    /// Starts a game with a known word.
    ///
    /// Letters start hidden. Anything else (spaces, digits, dashes) is shown
    /// as is since only letters can be guessed.
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.trim().to_lowercase().chars().collect();
        let revealed = word
            .iter()
            .map(|c| match c.is_alphabetic() {
                true => PLACEHOLDER,
                false => *c,
            })
            .collect();
        debug!("new hangman game with a {} characters word", word.len());

        Hangman {
            word,
            revealed,
            wrong_guesses: Vec::new(),
            history: Vec::new(),
            active: true,
        }
    }

    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    #[cfg(test)]
    pub fn revealed(&self) -> &[char] {
        &self.revealed
    }

    #[cfg(test)]
    pub fn wrong_guesses(&self) -> &[String] {
        &self.wrong_guesses
    }

    #[cfg(test)]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn attempts(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A lost game shows the whole word too, only a win reveals it unhanged.
    #[cfg(test)]
    pub fn is_solved(&self) -> bool {
        !self.is_hanged() && !self.revealed.contains(&PLACEHOLDER)
    }

    /// Gallows stage to display, the number of wrong guesses.
    pub fn stage(&self) -> usize {
        self.wrong_guesses.len().min(MAX_WRONG_GUESSES)
    }

    fn is_hanged(&self) -> bool {
        self.wrong_guesses.len() >= MAX_WRONG_GUESSES
    }

    /// Number of wrong guesses left before the figure is hanged.
    pub fn attempts_left(&self) -> usize {
        MAX_WRONG_GUESSES.saturating_sub(self.wrong_guesses.len())
    }

    /// A guess is a letter or a word: letters, with single spaces between words.
    fn is_valid_guess(guess: &str) -> bool {
        guess.chars().any(char::is_alphabetic)
            && guess.chars().all(|c| c.is_alphabetic() || c == ' ')
    }

    fn already_guessed(&self, guess: &str) -> bool {
        let mut chars = guess.chars();
        let in_revealed = match (chars.next(), chars.next()) {
            (Some(c), None) => self.revealed.contains(&c),
            _ => false,
        };

        in_revealed || self.wrong_guesses.iter().any(|wrong| wrong == guess)
    }

    /// Plays a letter or a full word.
    ///
    /// The guess is lower-cased. A guess that is not made of letters, or that
    /// was already played, is rejected without counting as an attempt.
    pub fn play(&mut self, input: &str) -> Result<Outcome, GameError> {
        if !self.active {
            return Err(GameError::GameOver);
        }

        let guess = input
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ")
            .to_lowercase();
        if !Self::is_valid_guess(&guess) {
            return Err(GameError::InvalidInput(Expected::Letters));
        }
        if self.already_guessed(&guess) {
            return Err(GameError::AlreadyGuessed(guess));
        }

        self.history.push(guess.clone());

        let guessed_chars: Vec<char> = guess.chars().collect();
        if guessed_chars == self.word {
            self.revealed = self.word.clone();
        } else if guessed_chars.len() == 1 && self.word.contains(&guessed_chars[0]) {
            let letter = guessed_chars[0];
            self.word
                .iter()
                .zip(self.revealed.iter_mut())
                .filter(|(c, _)| **c == letter)
                .for_each(|(c, shown)| *shown = *c);
        } else {
            self.wrong_guesses.push(guess);
        }

        if !self.revealed.contains(&PLACEHOLDER) {
            self.active = false;
            return Ok(Outcome::Won);
        }

        if self.is_hanged() {
            // Show the word on the final board without counting it as solved
            self.revealed = self.word.clone();
            self.active = false;
            return Ok(Outcome::Lost);
        }

        Ok(Outcome::Continue)
    }

    pub fn render(&self) -> Board {
        let word = self
            .revealed
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");

        let wrong_guesses = match self.wrong_guesses.is_empty() {
            true => "None".to_owned(),
            false => self.wrong_guesses.join(", "),
        };

        let color = match self.is_hanged() {
            true => 0xFF0000,
            false => 0xFFC300,
        };

        Board::new("🔠 Hangman")
            .color(color)
            .drawing(STAGES[self.stage()])
            .monospace_field("Word", word)
            .block_field("Wrong guesses", wrong_guesses)
            .block_field("Attempts left", self.attempts_left().to_string())
    }
}
