//! Session orchestration and state management
//!
//! This module contains the main session struct and logic for driving one
//! trivia playthrough: configuration, question queue construction, tier
//! announcements, turn rotation, per-question rounds, early quit and the
//! final scoreboard.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{
    AlarmMessage,
    config::{GameConfig, GameMode},
    presenter::Presenter,
    question::{Difficulty, QuestionRecord, RepositoryError},
    round::{self, Round},
    scoreboard::{RankedEntry, Scoreboard},
    selector,
};

/// Represents the current phase or state of the session
///
/// The session moves from configuration through alternating tier
/// announcements and question rounds, to the final scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum State {
    /// Awaiting configuration and session start
    Setup,
    /// Blocking tier announcement awaiting the host's acknowledgement
    TierAnnouncement(Difficulty),
    /// Currently playing a specific question round
    Round(Box<Round>),
    /// Session has ended; the final scoreboard was emitted
    Finished,
}

/// Commands received from the presentation adapter
///
/// These are the only entry points into the session; each maps to a user
/// action on the shared screen. Commands that do not apply to the current
/// state are ignored.
#[derive(Debug, Clone, Deserialize)]
pub enum Command {
    /// Provide or replace the session configuration
    Configure(GameConfig),
    /// Build the question queue and begin the first question
    StartSession,
    /// Acknowledge a blocking tier announcement
    AcknowledgeTier,
    /// Reveal the options for the current question and start the countdown
    RevealOptions,
    /// Submit the turn-holder's chosen option
    SubmitAnswer(String),
    /// Move on from a resolved question
    Advance,
    /// Leave the session early, going straight to the final scoreboard
    Quit,
    /// Tear the session down and return to configuration
    Restart,
}

/// Update messages sent to the presentation layer about session progress
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum Notification {
    /// A difficulty tier is starting; blocks until acknowledged
    TierAnnounced {
        /// The tier about to be played
        difficulty: Difficulty,
    },
    /// The session ended; final standings are ready to display
    SessionFinished {
        /// Ranked entries, sorted by points descending
        standings: Vec<RankedEntry>,
    },
    /// The submitted configuration was rejected; the host may retry
    ConfigRejected {
        /// Human-readable reason for the rejection
        reason: String,
    },
}

/// The session state machine for one trivia playthrough
///
/// Owns all mutable game state; recreated semantics apply per session via
/// [`Command::Restart`], with no carry-over. All commands and scheduled
/// alarms are funneled through [`Game::receive_command`] and
/// [`Game::receive_alarm`], serializing the countdown and input paths.
#[derive(Serialize, Deserialize)]
pub struct Game {
    /// The full question pool loaded by the repository
    pool: Vec<QuestionRecord>,
    /// Validated configuration, present once the host configured the session
    config: Option<GameConfig>,
    /// The ordered question queue, fixed after selection
    queue: Vec<QuestionRecord>,
    /// Cursor into the queue, 0-based
    current_index: usize,
    /// The turn rotation, one entry per configured player slot
    turn_order: Vec<String>,
    /// Cursor into the turn rotation, wraps modulo its length
    turn_index: usize,
    /// Scoring for this session
    pub scoreboard: Scoreboard,
    /// Last tier announced, used to detect tier boundaries in progressive mode
    last_announced: Option<Difficulty>,
    /// Current phase of the session
    pub state: State,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the question pool
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Creates a session core over the loaded question pool
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NoQuestions`] when the pool is empty;
    /// nothing is playable and the presentation layer should show a fatal
    /// startup condition.
    pub fn new(pool: Vec<QuestionRecord>) -> Result<Self, RepositoryError> {
        if pool.is_empty() {
            return Err(RepositoryError::NoQuestions);
        }

        Ok(Self {
            pool,
            config: None,
            queue: Vec::new(),
            current_index: 0,
            turn_order: Vec::new(),
            turn_index: 0,
            scoreboard: Scoreboard::default(),
            last_announced: None,
            state: State::Setup,
        })
    }

    /// Returns the current turn cursor
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Returns the question queue built at session start
    pub fn queue(&self) -> &[QuestionRecord] {
        &self.queue
    }

    /// Handles a command from the presentation adapter
    ///
    /// Commands that do not apply to the current state are silently
    /// ignored, so a stale button press can never corrupt the session.
    ///
    /// # Arguments
    ///
    /// * `command` - The incoming command to process
    /// * `schedule_alarm` - Function to schedule delayed alarm messages
    /// * `presenter` - Sink for notifications produced by the command
    pub fn receive_command<P: Presenter, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        command: Command,
        schedule_alarm: S,
        presenter: &P,
    ) {
        match command {
            Command::Configure(config) => match config.validated() {
                Ok(config) => {
                    if matches!(self.state, State::Setup) {
                        self.config = Some(config);
                    }
                }
                Err(error) => presenter.show(
                    &Notification::ConfigRejected {
                        reason: error.to_string(),
                    }
                    .into(),
                ),
            },
            Command::StartSession => self.start_session(presenter),
            Command::AcknowledgeTier => {
                if matches!(self.state, State::TierAnnouncement(_)) {
                    self.enter_round(presenter);
                }
            }
            Command::RevealOptions => {
                if let State::Round(round) = &mut self.state {
                    round.reveal_options(schedule_alarm, presenter);
                }
            }
            Command::SubmitAnswer(option) => {
                if let State::Round(round) = &mut self.state {
                    round.submit_answer(&option, &mut self.scoreboard, presenter);
                }
            }
            Command::Advance => self.advance(presenter),
            Command::Quit => self.quit(presenter),
            Command::Restart => self.restart(),
        }
    }

    /// Handles a scheduled alarm message
    ///
    /// Ticks are only forwarded to a live round for the matching question;
    /// anything else is a stale alarm from an already-resolved or torn-down
    /// round and is dropped.
    pub fn receive_alarm<P: Presenter, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_alarm: S,
        presenter: &P,
    ) {
        let AlarmMessage::Round(round::AlarmMessage::Tick { index }) = &message;

        if let State::Round(round) = &mut self.state {
            if round.index() == *index {
                round.receive_alarm(&message, &mut self.scoreboard, schedule_alarm, presenter);
            }
        }
    }

    /// Builds the question queue and begins the first question
    ///
    /// Runs the selector once, zeroes the scoreboard for the configured
    /// roster and resets both cursors. An empty selection result finalizes
    /// immediately with an all-zero scoreboard.
    fn start_session<P: Presenter>(&mut self, presenter: &P) {
        if !matches!(self.state, State::Setup) {
            return;
        }
        let Some(config) = &self.config else {
            return;
        };

        self.queue = selector::select(&self.pool, config);
        self.turn_order = config.player_names().to_vec();
        self.scoreboard = Scoreboard::new(self.turn_order.iter().map(String::as_str));
        self.current_index = 0;
        self.turn_index = 0;
        self.last_announced = None;

        self.begin_question(presenter);
    }

    /// Starts the question at the current cursor, or finishes the session
    ///
    /// The tier announcement check runs first: the very first question
    /// always announces its tier, and in progressive mode so does every
    /// tier boundary. The announcement blocks until acknowledged.
    fn begin_question<P: Presenter>(&mut self, presenter: &P) {
        let Some(question) = self.queue.get(self.current_index) else {
            self.finish(presenter);
            return;
        };
        let Some(config) = &self.config else {
            return;
        };

        let difficulty = question.difficulty();
        let announce = self.current_index == 0
            || (config.mode() == GameMode::Progressive
                && self.last_announced != Some(difficulty));

        if announce {
            self.last_announced = Some(difficulty);
            self.state = State::TierAnnouncement(difficulty);
            presenter.show(&Notification::TierAnnounced { difficulty }.into());
        } else {
            self.enter_round(presenter);
        }
    }

    /// Creates the round for the current question and announces it
    fn enter_round<P: Presenter>(&mut self, presenter: &P) {
        let Some(config) = &self.config else {
            return;
        };
        let Some(question) = self.queue.get(self.current_index).cloned() else {
            return;
        };
        let Some(turn_player) = self.turn_order.get(self.turn_index).cloned() else {
            return;
        };

        let mut round = Round::new(
            question,
            self.current_index,
            self.queue.len(),
            turn_player,
            config.time_limit(),
        );
        round.announce(presenter);
        self.state = State::Round(Box::new(round));
    }

    /// Moves past a resolved question
    ///
    /// Advances the queue cursor, rotates the turn to the next player
    /// (wrapping at the roster boundary) and begins the next question or
    /// finishes the session.
    fn advance<P: Presenter>(&mut self, presenter: &P) {
        let State::Round(round) = &self.state else {
            return;
        };
        if !round.is_resolved() {
            return;
        }

        self.current_index += 1;
        if !self.turn_order.is_empty() {
            self.turn_index = (self.turn_index + 1) % self.turn_order.len();
        }

        self.begin_question(presenter);
    }

    /// Leaves the session early
    ///
    /// Stops any in-flight countdown first, then routes straight to the
    /// final scoreboard with whatever scores have accrued.
    fn quit<P: Presenter>(&mut self, presenter: &P) {
        if matches!(self.state, State::Setup | State::Finished) {
            return;
        }

        if let State::Round(round) = &mut self.state {
            round.cancel_countdown();
        }

        self.finish(presenter);
    }

    /// Ends the session and emits the final standings
    fn finish<P: Presenter>(&mut self, presenter: &P) {
        self.state = State::Finished;
        presenter.show(
            &Notification::SessionFinished {
                standings: self.scoreboard.final_standings().to_vec(),
            }
            .into(),
        );
    }

    /// Tears the session down and returns to configuration
    ///
    /// The question pool and the last accepted configuration survive; all
    /// per-session state is recreated from scratch on the next start.
    fn restart(&mut self) {
        self.queue.clear();
        self.current_index = 0;
        self.turn_order.clear();
        self.turn_index = 0;
        self.scoreboard = Scoreboard::default();
        self.last_announced = None;
        self.state = State::Setup;
    }
}
