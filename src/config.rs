//! Session configuration and validation
//!
//! This module defines the host-provided configuration for one playthrough:
//! the player roster, the number of questions, the per-question time limit,
//! the enabled difficulty tiers and the selection mode. Validation failures
//! are user-correctable and never mutate session state.

use enum_map::EnumMap;
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::question::Difficulty;

/// Question selection and ordering mode for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Uniform sampling with fully randomized order, tiers interleaved
    Random,
    /// Tiered sampling played in fixed order easy, medium, hard
    Progressive,
}

type ValidationResult = garde::Result;

/// Validates that a duration falls within specified bounds
fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    field: &'static str,
    val: &Duration,
) -> ValidationResult {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// Validates the per-question answer time limit
fn validate_time_limit(val: &Duration) -> ValidationResult {
    validate_duration::<
        { crate::constants::game::MIN_TIME_LIMIT },
        { crate::constants::game::MAX_TIME_LIMIT },
    >("time_limit", val)
}

/// Validates that at least one difficulty tier is enabled
fn validate_enabled_difficulties(val: &EnumMap<Difficulty, bool>) -> ValidationResult {
    if val.values().any(|enabled| *enabled) {
        Ok(())
    } else {
        Err(garde::Error::new("at least one difficulty must be enabled"))
    }
}

/// Configuration for one trivia session, created once from host input
///
/// Immutable after session start. Obtain a usable value through
/// [`GameConfig::validated`], which trims player names and checks every
/// invariant.
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GameConfig {
    /// Ordered player roster; also defines the turn rotation
    #[garde(
        length(
            min = crate::constants::game::MIN_PLAYER_COUNT,
            max = crate::constants::game::MAX_PLAYER_COUNT,
        ),
        inner(length(min = 1))
    )]
    player_names: Vec<String>,
    /// Requested number of questions, clamped later to the available pool
    #[garde(range(min = 1))]
    question_count: usize,
    /// Time allowed for answering each question once options are revealed
    #[garde(custom(|v, _| validate_time_limit(v)))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    time_limit: Duration,
    /// Which difficulty tiers participate in selection
    #[garde(custom(|v, _| validate_enabled_difficulties(v)))]
    enabled_difficulties: EnumMap<Difficulty, bool>,
    /// Question selection and ordering mode
    #[garde(skip)]
    mode: GameMode,
}

impl GameConfig {
    /// Creates a configuration from raw host input
    ///
    /// No validation happens here; call [`GameConfig::validated`] before
    /// handing the value to the session.
    pub fn new(
        player_names: Vec<String>,
        question_count: usize,
        time_limit: Duration,
        enabled_difficulties: EnumMap<Difficulty, bool>,
        mode: GameMode,
    ) -> Self {
        Self {
            player_names,
            question_count,
            time_limit,
            enabled_difficulties,
            mode,
        }
    }

    /// Trims player names and drops entries left empty after trimming
    ///
    /// Duplicate names are kept: they rotate as separate turns but share a
    /// single scoreboard entry.
    fn normalized(mut self) -> Self {
        self.player_names = self
            .player_names
            .iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Normalizes and validates the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing every violated invariant: empty
    /// roster, zero enabled difficulties, out-of-range question count or
    /// time limit.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let config = self.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Returns the player roster in turn order
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Returns the requested question count
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Returns the per-question time limit
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Returns whether the given tier participates in selection
    pub fn enabled(&self, difficulty: Difficulty) -> bool {
        self.enabled_difficulties[difficulty]
    }

    /// Returns the enabled tiers in fixed ascending order
    pub fn enabled_tiers(&self) -> Vec<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .filter(|difficulty| self.enabled(*difficulty))
            .collect_vec()
    }

    /// Returns the selection mode
    pub fn mode(&self) -> GameMode {
        self.mode
    }
}

/// A user-correctable configuration rejection
///
/// Surfaced to the presentation layer as a `ConfigRejected` notification;
/// the host may retry any number of times.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ConfigError(#[from] garde::Report);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use enum_map::enum_map;

    use super::*;

    fn all_tiers() -> EnumMap<Difficulty, bool> {
        enum_map! { _ => true }
    }

    fn config(names: &[&str]) -> GameConfig {
        GameConfig::new(
            names.iter().map(|n| (*n).to_owned()).collect(),
            6,
            Duration::from_secs(30),
            all_tiers(),
            GameMode::Random,
        )
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config(&["Ana", "Leo"]).validated().is_ok());
    }

    #[test]
    fn test_names_are_trimmed_and_empties_dropped() {
        let validated = config(&["  Ana ", "   ", "Leo"]).validated().unwrap();
        assert_eq!(validated.player_names(), &["Ana", "Leo"]);
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(config(&[]).validated().is_err());
        assert!(config(&["   ", ""]).validated().is_err());
    }

    #[test]
    fn test_too_many_players_rejected() {
        assert!(config(&["A", "B", "C", "D", "E", "F"]).validated().is_err());
    }

    #[test]
    fn test_time_limit_bounds() {
        let mut short = config(&["Ana"]);
        short.time_limit = Duration::from_secs(4);
        assert!(short.validated().is_err());

        let mut lowest = config(&["Ana"]);
        lowest.time_limit = Duration::from_secs(5);
        assert!(lowest.validated().is_ok());
    }

    #[test]
    fn test_no_enabled_difficulties_rejected() {
        let mut none = config(&["Ana"]);
        none.enabled_difficulties = enum_map! { _ => false };
        assert!(none.validated().is_err());
    }

    #[test]
    fn test_zero_question_count_rejected() {
        let mut zero = config(&["Ana"]);
        zero.question_count = 0;
        assert!(zero.validated().is_err());
    }

    #[test]
    fn test_enabled_tiers_fixed_order() {
        let mut config = config(&["Ana"]);
        config.enabled_difficulties = enum_map! {
            Difficulty::Easy => true,
            Difficulty::Medium => false,
            Difficulty::Hard => true,
        };
        assert_eq!(
            config.enabled_tiers(),
            vec![Difficulty::Easy, Difficulty::Hard]
        );
    }
}
