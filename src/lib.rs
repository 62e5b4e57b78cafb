//! # Trivio Game Library
//!
//! This library provides the core session logic for a turn-based trivia
//! quiz played by a small group on one shared screen. It handles session
//! configuration, question selection, turn rotation, the per-question
//! countdown, scoring and the tie-aware final scoreboard.
//!
//! The library is presentation-agnostic: it emits [`Notification`] values
//! through a [`presenter::Presenter`] and asks the embedding runtime to
//! deliver [`AlarmMessage`] values back after a delay. All commands and
//! alarms must be funneled through the session one at a time.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod config;
pub mod game;
pub mod presenter;
pub mod question;
pub mod round;
pub mod scoreboard;
pub mod selector;

/// Messages sent to update the presentation layer's view of the session
///
/// This enum wraps every notification the session can emit, from both the
/// session-level state machine and the per-question round controller.
#[derive(Debug, Serialize, Clone, PartialEq, derive_more::From)]
pub enum Notification {
    /// Session-level notifications
    Game(game::Notification),
    /// Per-question round notifications
    Round(round::Notification),
}

impl Notification {
    /// Converts the notification to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// These messages are scheduled by the session and must be delivered back
/// through [`game::Game::receive_alarm`] after the requested delay.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Countdown ticks for the current question round
    Round(round::AlarmMessage),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use crate::{
        Notification,
        presenter::Presenter,
        question::{Difficulty, QuestionRecord},
    };

    /// Presenter double that records every notification it is shown.
    #[derive(Debug, Default)]
    pub struct MockPresenter {
        shown: Mutex<Vec<Notification>>,
    }

    impl MockPresenter {
        /// Drains and returns the notifications recorded so far.
        pub fn taken(&self) -> Vec<Notification> {
            std::mem::take(&mut self.shown.lock().unwrap())
        }
    }

    impl Presenter for MockPresenter {
        fn show(&self, notification: &Notification) {
            self.shown.lock().unwrap().push(notification.clone());
        }
    }

    pub fn question(text: &str, difficulty: Difficulty) -> QuestionRecord {
        QuestionRecord::new(
            text.to_owned(),
            difficulty,
            [
                "a".to_owned(),
                "b".to_owned(),
                "c".to_owned(),
                "d".to_owned(),
            ],
            "a".to_owned(),
            "because".to_owned(),
        )
        .unwrap()
    }

    pub fn easy_question(text: &str) -> QuestionRecord {
        question(text, Difficulty::Easy)
    }

    /// A pool with three questions in each difficulty tier.
    pub fn tiered_pool() -> Vec<QuestionRecord> {
        Difficulty::ALL
            .into_iter()
            .flat_map(|difficulty| {
                (0..3).map(move |i| question(&format!("{difficulty} {i}"), difficulty))
            })
            .collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use enum_map::enum_map;
    use web_time::Duration;

    use super::*;
    use crate::{
        config::{GameConfig, GameMode},
        game::{Command, Game, State},
        question::Difficulty,
        round::{NextAction, Outcome},
        scoreboard::RankedEntry,
        test_support::{MockPresenter, easy_question},
    };

    fn no_alarms(_: AlarmMessage, _: Duration) {}

    /// Delivers countdown ticks for the live round until it resolves.
    fn drain_countdown(game: &mut Game, presenter: &MockPresenter) {
        let index = match &game.state {
            State::Round(round) => round.index(),
            other => panic!("expected a round, got {other:?}"),
        };
        for _ in 0..200 {
            game.receive_alarm(
                AlarmMessage::Round(round::AlarmMessage::Tick { index }),
                no_alarms,
                presenter,
            );
        }
    }

    #[test]
    fn test_notification_to_message() {
        let notification = Notification::Game(game::Notification::TierAnnounced {
            difficulty: Difficulty::Easy,
        });
        let json = notification.to_message();

        assert!(json.contains("Game"));
        assert!(json.contains("TierAnnounced"));
        assert!(json.contains("Easy"));
    }

    #[test]
    fn test_alarm_message_round_trips_through_json() {
        let alarm = AlarmMessage::Round(round::AlarmMessage::Tick { index: 3 });
        let json = serde_json::to_string(&alarm).unwrap();
        let back: AlarmMessage = serde_json::from_str(&json).unwrap();

        let AlarmMessage::Round(round::AlarmMessage::Tick { index }) = back;
        assert_eq!(index, 3);
    }

    #[test]
    fn test_full_session_two_players_three_questions() {
        fastrand::seed(97);
        let presenter = MockPresenter::default();

        let pool = vec![
            easy_question("first"),
            easy_question("second"),
            easy_question("third"),
        ];
        let mut game = Game::new(pool).unwrap();

        let config = GameConfig::new(
            vec!["Ana".to_owned(), "Leo".to_owned()],
            3,
            Duration::from_secs(5),
            enum_map! { Difficulty::Easy => true, _ => false },
            GameMode::Random,
        );
        game.receive_command(Command::Configure(config), no_alarms, &presenter);
        game.receive_command(Command::StartSession, no_alarms, &presenter);

        // The first question opens with its tier announcement.
        assert!(matches!(game.state, State::TierAnnouncement(Difficulty::Easy)));
        game.receive_command(Command::AcknowledgeTier, no_alarms, &presenter);

        // Question 1: Ana answers correctly and banks 5 points.
        game.receive_command(Command::RevealOptions, no_alarms, &presenter);
        game.receive_command(
            Command::SubmitAnswer("a".to_owned()),
            no_alarms,
            &presenter,
        );
        let shown = presenter.taken();
        match shown.last() {
            Some(Notification::Round(round::Notification::AnswerResolved {
                outcome,
                next,
                ..
            })) => {
                assert_eq!(*outcome, Outcome::Correct { points_awarded: 5 });
                assert_eq!(*next, NextAction::NextQuestion);
            }
            other => panic!("expected AnswerResolved, got {other:?}"),
        }
        game.receive_command(Command::Advance, no_alarms, &presenter);

        // Question 2: Leo lets the countdown expire.
        game.receive_command(Command::RevealOptions, no_alarms, &presenter);
        drain_countdown(&mut game, &presenter);
        match presenter.taken().last() {
            Some(Notification::Round(round::Notification::AnswerResolved {
                outcome,
                selected_option,
                next,
                ..
            })) => {
                assert_eq!(*outcome, Outcome::Timeout);
                assert!(selected_option.is_none());
                assert_eq!(*next, NextAction::LastQuestion);
            }
            other => panic!("expected AnswerResolved, got {other:?}"),
        }
        game.receive_command(Command::Advance, no_alarms, &presenter);

        // Question 3: Ana again, wrong this time.
        game.receive_command(Command::RevealOptions, no_alarms, &presenter);
        game.receive_command(
            Command::SubmitAnswer("b".to_owned()),
            no_alarms,
            &presenter,
        );
        match presenter.taken().last() {
            Some(Notification::Round(round::Notification::AnswerResolved {
                outcome,
                next,
                ..
            })) => {
                assert_eq!(*outcome, Outcome::Wrong);
                assert_eq!(*next, NextAction::FinalScoreboard);
            }
            other => panic!("expected AnswerResolved, got {other:?}"),
        }
        game.receive_command(Command::Advance, no_alarms, &presenter);

        // Ana finishes sole champion at 5 points; Leo second at zero.
        assert!(matches!(game.state, State::Finished));
        match presenter.taken().last() {
            Some(Notification::Game(game::Notification::SessionFinished { standings })) => {
                assert_eq!(
                    standings,
                    &vec![
                        RankedEntry {
                            name: "Ana".to_owned(),
                            points: 5,
                            position: 1,
                            champion: true,
                        },
                        RankedEntry {
                            name: "Leo".to_owned(),
                            points: 0,
                            position: 2,
                            champion: false,
                        },
                    ]
                );
            }
            other => panic!("expected SessionFinished, got {other:?}"),
        }
    }
}
