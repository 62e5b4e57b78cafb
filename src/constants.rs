//! Configuration constants for the trivia session core
//!
//! This module contains all the configuration limits and constraints
//! used throughout the session core to ensure data integrity and
//! provide consistent boundaries for different game components.

/// Session configuration constants
pub mod game {
    /// Minimum number of players in a session
    pub const MIN_PLAYER_COUNT: usize = 1;
    /// Maximum number of players in a session (pass-the-device style)
    pub const MAX_PLAYER_COUNT: usize = 5;
    /// Minimum time limit in seconds for answering a question
    pub const MIN_TIME_LIMIT: u64 = 5;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_TIME_LIMIT: u64 = 240;
}

/// Question record constants
pub mod question {
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
}

/// Points awarded for a correct answer, by difficulty tier
pub mod scoring {
    /// Points for a correctly answered easy question
    pub const EASY_POINTS: u64 = 5;
    /// Points for a correctly answered medium question
    pub const MEDIUM_POINTS: u64 = 10;
    /// Points for a correctly answered hard question
    pub const HARD_POINTS: u64 = 15;
}

/// Countdown timing constants
pub mod countdown {
    /// Number of countdown ticks per second
    pub const TICKS_PER_SECOND: u32 = 10;
    /// Interval between two countdown ticks in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 1000 / TICKS_PER_SECOND as u64;
    /// Fraction of remaining time below which the countdown is flagged as low
    pub const LOW_TIME_FRACTION: f64 = 0.3;
}
