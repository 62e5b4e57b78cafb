//! Per-question round controller
//!
//! This module implements the lifecycle of a single question: announcing it
//! with options hidden, revealing the options and racing a tick-driven
//! countdown against the player's answer, resolving exactly once, and
//! labelling the control that advances the session.
//!
//! The countdown and the answer path both try to move the round from
//! [`RoundPhase::Countdown`] to [`RoundPhase::Resolved`]. All commands and
//! alarms are serialized through the session's event queue, and the
//! `change_phase` compare-and-flip lets at most one of them win; the loser
//! is a silent no-op.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Duration;

use crate::{
    constants,
    presenter::Presenter,
    question::{Difficulty, QuestionRecord},
    scoreboard::Scoreboard,
};

/// Interval between two countdown ticks
const TICK_INTERVAL: Duration = Duration::from_millis(constants::countdown::TICK_INTERVAL_MS);

/// Represents the current phase of a question round
///
/// A round progresses from the hidden-options announcement through the
/// countdown to its single resolution; the session loops back to a fresh
/// round (or finishes) on advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RoundPhase {
    /// Initial state before the question has been announced
    #[default]
    Unstarted,
    /// Question visible, options hidden, no countdown running
    AwaitingReveal,
    /// Options visible, countdown running against player input
    Countdown,
    /// Answer locked in (or timed out), feedback shown, countdown stopped
    Resolved,
}

/// Label for the control that advances the session after a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// More than one question remains
    NextQuestion,
    /// The question just answered was the second-to-last
    LastQuestion,
    /// The question just answered was the last; the scoreboard is next
    FinalScoreboard,
}

/// Result of resolving a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The turn-holder picked the correct option
    Correct {
        /// Points added to the turn-holder's score
        points_awarded: u64,
    },
    /// The turn-holder picked a wrong option; no score change
    Wrong,
    /// The countdown expired before any option was picked; no score change
    Timeout,
}

/// Alarm messages scheduled by the round's countdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One countdown tick for the question at the given queue index
    Tick {
        /// Queue index of the question this tick belongs to
        index: usize,
    },
}

/// Update messages sent to the presentation layer during a round
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum Notification {
    /// A question is ready, options hidden until revealed
    QuestionReady {
        /// Queue index of the question, 0-based
        index: usize,
        /// Total number of questions in the queue
        count: usize,
        /// Difficulty tier of the question
        difficulty: Difficulty,
        /// The question text
        question: String,
        /// The four options in this round's randomized order
        options: Vec<String>,
        /// Name of the player whose turn it is
        turn_player: String,
        /// Points at stake for a correct answer
        points: u64,
    },
    /// Periodic countdown progress while options are visible
    CountdownTick {
        /// Fraction of the time limit still remaining, 1.0 down to 0.0
        fraction_remaining: f64,
        /// Whether remaining time fell below the low-time threshold
        low_time: bool,
    },
    /// The round resolved; feedback and explanation are ready to show
    AnswerResolved {
        /// How the round resolved
        outcome: Outcome,
        /// The correct option, always revealed
        correct_option: String,
        /// The option the player picked; absent on timeout so no
        /// wrong-option highlight is rendered
        selected_option: Option<String>,
        /// Explanation attached to the question
        explanation: String,
        /// Label for the advance control
        next: NextAction,
    },
}

/// Runtime state of one question round
///
/// Owned by the session for the duration of a single question and rebuilt
/// from scratch for the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// The question being played
    question: QuestionRecord,
    /// Queue index of this question, 0-based
    index: usize,
    /// Total number of questions in the queue
    count: usize,
    /// Name of the turn-holder, the only player who can score this round
    turn_player: String,
    /// Points at stake, fixed from the question's difficulty
    points: u64,
    /// Options in this round's randomized presentation order
    shuffled_options: Vec<String>,
    /// Current phase
    phase: RoundPhase,
    /// Whether a countdown is currently live; flipped to false exactly once
    timer_active: bool,
    /// Total ticks in a full countdown
    ticks_total: u32,
    /// Ticks left before timeout
    ticks_remaining: u32,
}

impl Round {
    /// Creates the round for one question
    ///
    /// Points are taken from the fixed difficulty scoring table and the
    /// options are shuffled afresh for this round.
    pub fn new(
        question: QuestionRecord,
        index: usize,
        count: usize,
        turn_player: String,
        time_limit: Duration,
    ) -> Self {
        let points = question.difficulty().points();
        let shuffled_options = question.shuffled_options();
        let ticks_total = time_limit.as_secs() as u32 * constants::countdown::TICKS_PER_SECOND;

        Self {
            question,
            index,
            count,
            turn_player,
            points,
            shuffled_options,
            phase: RoundPhase::Unstarted,
            timer_active: false,
            ticks_total,
            ticks_remaining: ticks_total,
        }
    }

    /// Returns the queue index of this round's question
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the current phase
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Checks whether the round has resolved
    pub fn is_resolved(&self) -> bool {
        self.phase == RoundPhase::Resolved
    }

    /// Attempts to transition from one phase to another
    ///
    /// Returns `true` only when the current phase matched `before`. This is
    /// the single atomic flip both resolution paths race through.
    fn change_phase(&mut self, before: RoundPhase, after: RoundPhase) -> bool {
        if self.phase == before {
            self.phase = after;
            true
        } else {
            false
        }
    }

    /// Announces the question with its options hidden
    pub fn announce<P: Presenter>(&mut self, presenter: &P) {
        if self.change_phase(RoundPhase::Unstarted, RoundPhase::AwaitingReveal) {
            presenter.show(
                &Notification::QuestionReady {
                    index: self.index,
                    count: self.count,
                    difficulty: self.question.difficulty(),
                    question: self.question.text().to_owned(),
                    options: self.shuffled_options.clone(),
                    turn_player: self.turn_player.clone(),
                    points: self.points,
                }
                .into(),
            );
        }
    }

    /// Reveals the options and starts the countdown
    ///
    /// Valid only from [`RoundPhase::AwaitingReveal`]. Emits a full-bar tick
    /// immediately and schedules the first alarm tick.
    pub fn reveal_options<P: Presenter, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        mut schedule_alarm: S,
        presenter: &P,
    ) {
        if self.change_phase(RoundPhase::AwaitingReveal, RoundPhase::Countdown) {
            self.timer_active = true;
            self.ticks_remaining = self.ticks_total;

            presenter.show(
                &Notification::CountdownTick {
                    fraction_remaining: 1.0,
                    low_time: false,
                }
                .into(),
            );

            schedule_alarm(AlarmMessage::Tick { index: self.index }.into(), TICK_INTERVAL);
        }
    }

    /// Submits the turn-holder's answer
    ///
    /// Valid only while the countdown runs; if the timeout already resolved
    /// the round this is a no-op.
    pub fn submit_answer<P: Presenter>(
        &mut self,
        selected_option: &str,
        scoreboard: &mut Scoreboard,
        presenter: &P,
    ) {
        self.resolve(Some(selected_option), scoreboard, presenter);
    }

    /// Processes one countdown tick
    ///
    /// Ticks for a different question, a resolved round, or a cancelled
    /// countdown exit immediately without rescheduling. A live tick reports
    /// progress and either reschedules itself or resolves the round as a
    /// timeout when time is up.
    pub fn receive_alarm<P: Presenter, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &crate::AlarmMessage,
        scoreboard: &mut Scoreboard,
        mut schedule_alarm: S,
        presenter: &P,
    ) {
        let crate::AlarmMessage::Round(AlarmMessage::Tick { index }) = message;

        if *index != self.index || !self.timer_active || self.phase != RoundPhase::Countdown {
            return;
        }

        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        let fraction_remaining = f64::from(self.ticks_remaining) / f64::from(self.ticks_total);

        presenter.show(
            &Notification::CountdownTick {
                fraction_remaining,
                low_time: fraction_remaining < constants::countdown::LOW_TIME_FRACTION,
            }
            .into(),
        );

        if self.ticks_remaining == 0 {
            self.resolve(None, scoreboard, presenter);
        } else {
            schedule_alarm(AlarmMessage::Tick { index: self.index }.into(), TICK_INTERVAL);
        }
    }

    /// Stops a live countdown without resolving the round
    ///
    /// Used when the session is torn down early; pending ticks become
    /// no-ops.
    pub fn cancel_countdown(&mut self) {
        self.timer_active = false;
    }

    /// Resolves the round exactly once
    ///
    /// `selected_option` is `None` on the timeout path. Whichever caller
    /// loses the race against the phase flip returns without any state
    /// change or notification.
    fn resolve<P: Presenter>(
        &mut self,
        selected_option: Option<&str>,
        scoreboard: &mut Scoreboard,
        presenter: &P,
    ) {
        if !self.change_phase(RoundPhase::Countdown, RoundPhase::Resolved) {
            return;
        }

        self.timer_active = false;

        let outcome = match selected_option {
            None => Outcome::Timeout,
            Some(selected) if selected == self.question.correct_option() => {
                scoreboard.award(&self.turn_player, self.points);
                Outcome::Correct {
                    points_awarded: self.points,
                }
            }
            Some(_) => Outcome::Wrong,
        };

        presenter.show(
            &Notification::AnswerResolved {
                outcome,
                correct_option: self.question.correct_option().to_owned(),
                selected_option: selected_option.map(str::to_owned),
                explanation: self.question.explanation().to_owned(),
                next: self.next_action(),
            }
            .into(),
        );
    }

    /// Determines the label for the advance control
    fn next_action(&self) -> NextAction {
        let answered = self.index + 1;
        if answered == self.count {
            NextAction::FinalScoreboard
        } else if answered == self.count - 1 {
            NextAction::LastQuestion
        } else {
            NextAction::NextQuestion
        }
    }
}
