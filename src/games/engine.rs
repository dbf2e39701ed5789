//! Session dispatch.
//!
//! The [`GameEngine`] is the single entry point of the game core. It owns the
//! [`SessionStore`] and the randomness source and turns a raw player input
//! into a [`Turn`]: start a session, play a guess or reject the input.
//!
//! # Dispatch rules
//!
//! | session | input   | result                                   |
//! |---------|---------|------------------------------------------|
//! | absent  | empty   | a new session is stored, initial board   |
//! | absent  | present | [`GameError::NoActiveGame`]              |
//! | present | empty   | [`GameError::GameAlreadyRunning`]        |
//! | present | present | the turn is played and the board updated |
//!
//! Rock paper scissors is a single round and never stored: the input is the
//! player's choice and the round is played right away.

use log::{debug, info};

use crate::games::{
    Board, GameError, GameKind, GameSession, Hangman, NumberGuessing, Outcome, RandomSource,
    RockPaperScissors, SessionKey, SessionStore, SettingsError, random::choose,
};

/// Settings shared by every session built by the engine.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Upper bound (inclusive) of the number to guess
    max_number: u32,
    /// Attempts allowed in number guessing, unlimited when `None`
    max_attempts: Option<u32>,
    /// Hangman word list, lower-cased and never empty
    words: Vec<String>,
}

impl GameSettings {
    /// Builds the settings.
    ///
    /// Fails when `max_number` is zero, `max_attempts` is zero or no usable
    /// word is given. Words are trimmed and lower-cased, blank words are
    /// dropped.
    pub fn new(
        max_number: u32,
        max_attempts: Option<u32>,
        words: &[String],
    ) -> Result<Self, SettingsError> {
        if max_number == 0 {
            return Err(SettingsError::ZeroMaxNumber);
        }
        if max_attempts == Some(0) {
            return Err(SettingsError::ZeroMaxAttempts);
        }

        let words: Vec<String> = words
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        if words.is_empty() {
            return Err(SettingsError::NoWords);
        }

        Ok(GameSettings {
            max_number,
            max_attempts,
            words,
        })
    }

    #[cfg(test)]
    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    #[cfg(test)]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    #[cfg(test)]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// What happened during one call to [`GameEngine::handle_input`].
#[derive(Debug, Clone)]
pub struct Turn<H> {
    pub kind: GameKind,
    /// `None` when the call started a new session
    pub outcome: Option<Outcome>,
    /// Board after the turn, including the final annotation once the game is over
    pub board: Board,
    /// Handle of the message already displaying this session, if any
    pub board_handle: Option<H>,
    /// Number or word to disclose once the game is over
    pub secret: Option<String>,
}

impl<H> Turn<H> {
    /// Returns `true` when this turn started the session.
    #[cfg(test)]
    pub fn is_start(&self) -> bool {
        self.outcome.is_none()
    }

    /// Returns `true` when the session is over after this turn.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some_and(|outcome| outcome.is_terminal())
    }
}

/// Looks up, creates, plays and ends game sessions.
///
/// `R` is the randomness source, `H` the opaque handle of a board message.
pub struct GameEngine<R: RandomSource, H> {
    settings: GameSettings,
    rng: R,
    store: SessionStore<H>,
}

impl<R: RandomSource, H: Clone> GameEngine<R, H> {
    pub fn new(settings: GameSettings, rng: R) -> Self {
        GameEngine {
            settings,
            rng,
            store: SessionStore::new(),
        }
    }

    /// Handles a player input for a game kind in a channel.
    ///
    /// `input` is trimmed, a blank input counts as no input. See the module
    /// documentation for the dispatch rules.
    pub fn handle_input(
        &mut self,
        channel: &str,
        kind: GameKind,
        player: &str,
        input: Option<&str>,
    ) -> Result<Turn<H>, GameError> {
        let input = input.map(str::trim).filter(|input| !input.is_empty());

        if kind == GameKind::RockPaperScissors {
            return self.play_round(player, input);
        }

        let key = SessionKey::new(channel, kind);
        match (self.store.contains(&key), input) {
            (false, None) => self.start(key),
            (false, Some(_)) => Err(GameError::NoActiveGame(kind)),
            (true, None) => Err(GameError::GameAlreadyRunning(kind)),
            (true, Some(input)) => self.play_turn(key, player, input),
        }
    }

    /// Records the message displaying the session of `kind` in `channel`.
    ///
    /// Returns `false` if that session is not running anymore.
    pub fn attach_board(&mut self, channel: &str, kind: GameKind, handle: H) -> bool {
        self.store.attach_board(&SessionKey::new(channel, kind), handle)
    }

    #[cfg(test)]
    pub fn is_running(&self, channel: &str, kind: GameKind) -> bool {
        self.store.contains(&SessionKey::new(channel, kind))
    }

    #[cfg(test)]
    pub fn session(&self, channel: &str, kind: GameKind) -> Option<&GameSession> {
        self.store
            .get(&SessionKey::new(channel, kind))
            .map(|stored| &stored.session)
    }

    /// Number of sessions currently running.
    pub fn running_games(&self) -> usize {
        self.store.len()
    }

    /// Drops every running session.
    pub fn clear(&mut self) {
        if self.store.is_empty() {
            return;
        }

        info!("dropping {} running games", self.running_games());
        self.store.clear();
    }

    fn new_session(&mut self, kind: GameKind) -> Option<GameSession> {
        match kind {
            GameKind::NumberGuessing => Some(GameSession::NumberGuessing(NumberGuessing::new(
                &mut self.rng,
                self.settings.max_number,
                self.settings.max_attempts,
            ))),
            GameKind::Hangman => choose(&mut self.rng, &self.settings.words)
                .map(|word| GameSession::Hangman(Hangman::new(word))),
            GameKind::RockPaperScissors => None,
        }
    }

    fn start(&mut self, key: SessionKey) -> Result<Turn<H>, GameError> {
        let kind = key.kind;
        // Only stored kinds reach this point and the word list is never empty
        let session = self.new_session(kind).ok_or(GameError::NoActiveGame(kind))?;
        let board = session.render();

        info!("starting {} game in {}", kind, key.channel);
        self.store.insert(key, session)?;

        Ok(Turn {
            kind,
            outcome: None,
            board,
            board_handle: None,
            secret: None,
        })
    }

    fn play_turn(
        &mut self,
        key: SessionKey,
        player: &str,
        input: &str,
    ) -> Result<Turn<H>, GameError> {
        let kind = key.kind;
        let stored = self.store.get_mut(&key).ok_or(GameError::NoActiveGame(kind))?;
        debug_assert_eq!(stored.session.kind(), kind);

        let outcome = stored.session.play(player, input, &mut self.rng)?;
        let mut board = stored.session.render();
        debug!("{} turn in {} by {}: {:?}", kind, key.channel, player, outcome);

        if !outcome.is_terminal() {
            return Ok(Turn {
                kind,
                outcome: Some(outcome),
                board,
                board_handle: stored.board.clone(),
                secret: None,
            });
        }

        annotate(&mut board, outcome, player);
        let secret = stored.session.secret();
        let attempts = stored.session.attempts();
        let board_handle = self.store.remove(&key).and_then(|stored| stored.board);
        info!("{} game in {} finished after {} turns: {:?}", kind, key.channel, attempts, outcome);

        Ok(Turn {
            kind,
            outcome: Some(outcome),
            board,
            board_handle,
            secret,
        })
    }

    fn play_round(&mut self, player: &str, input: Option<&str>) -> Result<Turn<H>, GameError> {
        let choice = input.ok_or_else(|| GameError::InvalidChoice(String::new()))?;
        let mut session = GameSession::RockPaperScissors(RockPaperScissors::new(choice)?);

        let outcome = session.play(player, choice, &mut self.rng)?;
        debug!("rock paper scissors round by {}: {:?}", player, outcome);

        Ok(Turn {
            kind: GameKind::RockPaperScissors,
            outcome: Some(outcome),
            board: session.render(),
            board_handle: None,
            secret: session.secret(),
        })
    }
}

/// Adds the closing line of a finished session to its board.
fn annotate(board: &mut Board, outcome: Outcome, player: &str) {
    match outcome {
        Outcome::Won => board.push_field("🏆 Solved by", player, false),
        Outcome::Lost => board.push_field("💀 Hanged", player, false),
        Outcome::Exhausted => board.push_field("⌛ Out of attempts", player, false),
        Outcome::Continue | Outcome::Tied => {}
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::games::{Expected, Hint, MockRandomSource};

    const ROOM: &str = "!room:example.com";

    fn create_settings(words: &[&str]) -> GameSettings {
        let words: Vec<String> = words.iter().map(|word| word.to_string()).collect();
        GameSettings::new(100, None, &words).unwrap()
    }

    fn create_engine(
        settings: GameSettings,
        rng: MockRandomSource,
    ) -> GameEngine<MockRandomSource, String> {
        GameEngine::new(settings, rng)
    }

    #[test]
    fn test_settings_validation() {
        let words = vec!["  Sunny ".to_owned(), " ".to_owned()];
        let settings = GameSettings::new(10, Some(3), &words).unwrap();
        assert_eq!(settings.words(), &["sunny".to_owned()]);
        assert_eq!(settings.max_number(), 10);
        assert_eq!(settings.max_attempts(), Some(3));

        assert_eq!(
            GameSettings::new(0, None, &words).unwrap_err(),
            SettingsError::ZeroMaxNumber
        );
        assert_eq!(
            GameSettings::new(10, Some(0), &words).unwrap_err(),
            SettingsError::ZeroMaxAttempts
        );
        assert_eq!(GameSettings::new(10, None, &[]).unwrap_err(), SettingsError::NoWords);
        assert_eq!(
            GameSettings::new(10, None, &[" ".to_owned()]).unwrap_err(),
            SettingsError::NoWords
        );
    }

    #[test]
    fn test_number_guessing_scenario() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().with(eq(100)).times(1).return_const(37u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        assert!(turn.is_start());
        assert!(engine.is_running(ROOM, GameKind::NumberGuessing));

        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", Some("50"))
            .unwrap();
        assert_eq!(turn.outcome, Some(Outcome::Continue));
        assert_eq!(turn.board.field("Hint"), Some("⬇️"));
        match engine.session(ROOM, GameKind::NumberGuessing) {
            Some(GameSession::NumberGuessing(game)) => {
                assert_eq!(game.last_hint(), Some(Hint::Lower));
                assert_eq!(game.attempts(), 1);
            }
            _ => panic!("Expected number guessing session"),
        }

        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@bob:example.com", Some("37"))
            .unwrap();
        assert_eq!(turn.outcome, Some(Outcome::Won));
        assert!(turn.is_over());
        assert_eq!(turn.board.field("Attempts"), Some("2"));
        assert_eq!(turn.board.field("🏆 Solved by"), Some("@bob:example.com"));
        assert_eq!(turn.secret.as_deref(), Some("37"));
        assert!(!engine.is_running(ROOM, GameKind::NumberGuessing));
        assert_eq!(engine.running_games(), 0);
    }

    #[test]
    fn test_hangman_scenario() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().with(eq(0)).times(1).return_const(0u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", None)
            .unwrap();

        let turn = engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some("x"))
            .unwrap();
        assert_eq!(turn.outcome, Some(Outcome::Continue));
        assert_eq!(turn.board.field("Wrong guesses"), Some("x"));

        let turn = engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some("h"))
            .unwrap();
        assert_eq!(turn.board.field("Word"), Some("h _"));

        let turn = engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some("i"))
            .unwrap();
        assert_eq!(turn.outcome, Some(Outcome::Won));
        assert_eq!(turn.board.field("Word"), Some("h i"));
        assert_eq!(turn.secret.as_deref(), Some("hi"));
        assert!(!engine.is_running(ROOM, GameKind::Hangman));
    }

    #[test]
    fn test_hangman_loss_is_annotated() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(0u32);
        let mut engine = create_engine(create_settings(&["uri"]), rng);

        engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", None)
            .unwrap();
        for letter in ["a", "b", "c", "d", "e"] {
            engine
                .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some(letter))
                .unwrap();
        }
        let turn = engine
            .handle_input(ROOM, GameKind::Hangman, "@bob:example.com", Some("f"))
            .unwrap();

        assert_eq!(turn.outcome, Some(Outcome::Lost));
        assert_eq!(turn.board.field("💀 Hanged"), Some("@bob:example.com"));
        assert_eq!(turn.board.field("🏆 Solved by"), None);
        assert_eq!(turn.board.field("Word"), Some("u r i"));
        assert!(!engine.is_running(ROOM, GameKind::Hangman));
    }

    #[test]
    fn test_guess_without_game() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().never();
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        let result = engine.handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some("a"));
        assert!(matches!(result, Err(GameError::NoActiveGame(GameKind::Hangman))));
        assert_eq!(engine.running_games(), 0);
    }

    #[test]
    fn test_start_twice_is_a_no_op() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().times(1).return_const(0u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", None)
            .unwrap();
        engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", Some("h"))
            .unwrap();
        let before = engine.session(ROOM, GameKind::Hangman).unwrap().render();

        for input in [None, Some(""), Some("   ")] {
            let result = engine.handle_input(ROOM, GameKind::Hangman, "@bob:example.com", input);
            assert!(matches!(result, Err(GameError::GameAlreadyRunning(GameKind::Hangman))));
        }

        let session = engine.session(ROOM, GameKind::Hangman).unwrap();
        assert_eq!(session.render(), before);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_invalid_guess_keeps_session() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().times(1).return_const(37u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        let result =
            engine.handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", Some("1000"));

        assert!(matches!(
            result,
            Err(GameError::InvalidInput(Expected::Number { max_number: 100 }))
        ));
        assert_eq!(
            engine
                .session(ROOM, GameKind::NumberGuessing)
                .unwrap()
                .attempts(),
            0
        );
    }

    #[test]
    fn test_channels_are_independent() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(5u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input("!a:example.com", GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        engine
            .handle_input("!b:example.com", GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        engine
            .handle_input("!a:example.com", GameKind::Hangman, "@alice:example.com", None)
            .unwrap();
        assert_eq!(engine.running_games(), 3);

        engine
            .handle_input(
                "!a:example.com",
                GameKind::NumberGuessing,
                "@alice:example.com",
                Some("5"),
            )
            .unwrap();
        assert!(!engine.is_running("!a:example.com", GameKind::NumberGuessing));
        assert!(engine.is_running("!b:example.com", GameKind::NumberGuessing));
        assert!(engine.is_running("!a:example.com", GameKind::Hangman));
    }

    #[test]
    fn test_board_handle_is_returned() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(37u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        assert!(engine.attach_board(ROOM, GameKind::NumberGuessing, "$board".to_owned()));

        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", Some("1"))
            .unwrap();
        assert_eq!(turn.board_handle.as_deref(), Some("$board"));

        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", Some("37"))
            .unwrap();
        assert_eq!(turn.board_handle.as_deref(), Some("$board"));
        assert!(!engine.attach_board(ROOM, GameKind::NumberGuessing, "$late".to_owned()));
    }

    #[test]
    fn test_attempts_exhausted() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(37u32);
        let words = vec!["hi".to_owned()];
        let mut engine = create_engine(GameSettings::new(100, Some(1), &words).unwrap(), rng);

        engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", None)
            .unwrap();
        let turn = engine
            .handle_input(ROOM, GameKind::NumberGuessing, "@alice:example.com", Some("1"))
            .unwrap();

        assert_eq!(turn.outcome, Some(Outcome::Exhausted));
        assert_eq!(
            turn.board.field("⌛ Out of attempts"),
            Some("@alice:example.com")
        );
        assert_eq!(turn.secret.as_deref(), Some("37"));
        assert!(!engine.is_running(ROOM, GameKind::NumberGuessing));
    }

    #[test]
    fn test_rock_paper_scissors_rounds() {
        let mut rng = MockRandomSource::new();
        let mut draws = vec![2u32, 1, 0].into_iter();
        rng.expect_draw()
            .with(eq(2))
            .times(3)
            .returning(move |_| draws.next().unwrap());
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        let expected = [Outcome::Won, Outcome::Lost, Outcome::Tied];
        for outcome in expected {
            let turn = engine
                .handle_input(ROOM, GameKind::RockPaperScissors, "@alice:example.com", Some("rock"))
                .unwrap();
            assert_eq!(turn.outcome, Some(outcome));
            assert!(turn.is_over());
            assert!(turn.board_handle.is_none());
        }

        assert_eq!(engine.running_games(), 0);
    }

    #[test]
    fn test_rock_paper_scissors_invalid_choice() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().never();
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        let result = engine.handle_input(
            ROOM,
            GameKind::RockPaperScissors,
            "@alice:example.com",
            Some("well"),
        );
        assert!(matches!(result, Err(GameError::InvalidChoice(choice)) if choice == "well"));

        let result =
            engine.handle_input(ROOM, GameKind::RockPaperScissors, "@alice:example.com", None);
        assert!(matches!(result, Err(GameError::InvalidChoice(_))));
    }

    #[test]
    fn test_clear() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(0u32);
        let mut engine = create_engine(create_settings(&["hi"]), rng);

        engine
            .handle_input(ROOM, GameKind::Hangman, "@alice:example.com", None)
            .unwrap();
        engine.clear();
        assert_eq!(engine.running_games(), 0);
    }
}
