//! Single round rock paper scissors against the bot.

use std::{fmt, str::FromStr};

use log::debug;

use crate::games::{Board, GameError, Outcome, RandomSource};

/// A rock paper scissors choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    /// Every choice, in draw order.
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// Returns `true` when `self` wins against `other`.
    ///
    /// Rock beats scissors, scissors beats paper and paper beats rock.
    pub fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Scissors, Hand::Paper) | (Hand::Paper, Hand::Rock)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Hand::Rock => "🪨",
            Hand::Paper => "📄",
            Hand::Scissors => "✂️",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.name())
    }
}

impl FromStr for Hand {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = s.trim().to_lowercase();
        Hand::ALL
            .into_iter()
            .find(|hand| hand.name() == choice)
            .ok_or_else(|| GameError::InvalidChoice(s.trim().to_owned()))
    }
}

/// Result of a round from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Lose,
    Tie,
}

impl Verdict {
    /// Decides a round between the player and the bot.
    pub fn decide(player: Hand, bot: Hand) -> Self {
        if player == bot {
            Verdict::Tie
        } else if player.beats(bot) {
            Verdict::Win
        } else {
            Verdict::Lose
        }
    }

    fn label(self) -> &'static str {
        match self {
            Verdict::Win => "🎉 You win!",
            Verdict::Lose => "💀 You lose!",
            Verdict::Tie => "🤝 Tie!",
        }
    }
}

/// A single round. The player's choice is validated when the round is built,
/// the bot's choice is drawn when it is played.
#[derive(Debug, Clone)]
pub struct RockPaperScissors {
    player_choice: Hand,
    bot_choice: Option<Hand>,
    verdict: Option<Verdict>,
}

impl RockPaperScissors {
    /// Builds a round from the player's raw choice, case-insensitive.
    pub fn new(choice: &str) -> Result<Self, GameError> {
        let player_choice = choice.parse::<Hand>()?;

        Ok(RockPaperScissors {
            player_choice,
            bot_choice: None,
            verdict: None,
        })
    }

    #[cfg(test)]
    pub fn player_choice(&self) -> Hand {
        self.player_choice
    }

    pub fn bot_choice(&self) -> Option<Hand> {
        self.bot_choice
    }

    /// Number of rounds played, `0` or `1`.
    pub fn attempts(&self) -> u32 {
        u32::from(self.bot_choice.is_some())
    }

    pub fn is_active(&self) -> bool {
        self.verdict.is_none()
    }

    /// Draws the bot's choice and plays the round.
    pub fn play<R: RandomSource>(&mut self, rng: &mut R) -> Result<Verdict, GameError> {
        if !self.is_active() {
            return Err(GameError::GameOver);
        }

        let index = (rng.draw(Hand::ALL.len() as u32 - 1) as usize).min(Hand::ALL.len() - 1);
        self.play_against(Hand::ALL[index])
    }

    /// Plays the round against a known bot choice.
    pub fn play_against(&mut self, bot_choice: Hand) -> Result<Verdict, GameError> {
        if !self.is_active() {
            return Err(GameError::GameOver);
        }

        let verdict = Verdict::decide(self.player_choice, bot_choice);
        debug!(
            "rock paper scissors {:?} vs {:?} -> {:?}",
            self.player_choice, bot_choice, verdict
        );

        self.bot_choice = Some(bot_choice);
        self.verdict = Some(verdict);

        Ok(verdict)
    }

    /// Maps the round verdict onto the shared session outcome.
    pub fn outcome(verdict: Verdict) -> Outcome {
        match verdict {
            Verdict::Win => Outcome::Won,
            Verdict::Lose => Outcome::Lost,
            Verdict::Tie => Outcome::Tied,
        }
    }

    pub fn render(&self) -> Board {
        let board = Board::new("🪨📄✂️ Rock-Paper-Scissors")
            .color(0x3498DB)
            .inline_field("Player", self.player_choice.to_string());

        match (self.bot_choice, self.verdict) {
            (Some(bot_choice), Some(verdict)) => board
                .inline_field("Bot", bot_choice.to_string())
                .block_field("Result", verdict.label()),
            _ => board,
        }
    }
}
