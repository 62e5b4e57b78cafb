//! Score tracking and final ranking
//!
//! This module manages the scoring for one session: per-player point totals
//! mutated only by the round controller, and the tie-aware final standings
//! computed once at the end of the game.

use std::cmp::Reverse;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Serialization helper for the scoreboard
#[derive(Deserialize)]
struct ScoreboardSerde {
    entries: Vec<(String, u64)>,
}

/// Tracks player scores for one session
///
/// Entries are kept in encounter order, which makes the descending final
/// sort stable for tied scores. Duplicate player names collapse into one
/// shared entry at construction.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "ScoreboardSerde")]
pub struct Scoreboard {
    /// Player name and accumulated points, in encounter order
    entries: Vec<(String, u64)>,

    /// Final standings, computed once at game end
    #[serde(skip)]
    final_standings: once_cell_serde::sync::OnceCell<Vec<RankedEntry>>,
}

impl From<ScoreboardSerde> for Scoreboard {
    fn from(serde: ScoreboardSerde) -> Self {
        Scoreboard {
            entries: serde.entries,
            final_standings: once_cell_serde::sync::OnceCell::new(),
        }
    }
}

/// One row of the final scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Player name
    pub name: String,
    /// Total points accumulated over the session
    pub points: u64,
    /// Position in the descending sort, 1-based
    pub position: usize,
    /// Whether this player's score equals the maximum score
    pub champion: bool,
}

impl Scoreboard {
    /// Creates a scoreboard with every named player at zero points
    ///
    /// Duplicate names share one entry; encounter order is preserved.
    pub fn new<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut entries: Vec<(String, u64)> = Vec::new();
        for name in names {
            if !entries.iter().any(|(existing, _)| existing == name) {
                entries.push((name.to_owned(), 0));
            }
        }

        Self {
            entries,
            final_standings: once_cell_serde::sync::OnceCell::new(),
        }
    }

    /// Adds points to the named player's total
    ///
    /// Unknown names are ignored; the round controller only ever awards to
    /// players present in the roster.
    pub fn award(&mut self, name: &str, points: u64) {
        if let Some((_, total)) = self.entries.iter_mut().find(|(entry, _)| entry == name) {
            *total += points;
        }
    }

    /// Returns the named player's current total
    pub fn points(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, points)| *points)
    }

    /// Returns the number of scoreboard entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the scoreboard has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Computes the current standings, sorted by points descending
    ///
    /// The sort is stable, so tied players keep their encounter order.
    /// Every player whose score equals the maximum is marked champion,
    /// including the degenerate all-zero game where everyone is one.
    pub fn standings(&self) -> Vec<RankedEntry> {
        let sorted = self
            .entries
            .iter()
            .cloned()
            .sorted_by_key(|(_, points)| Reverse(*points))
            .collect_vec();

        let top_score = sorted.first().map_or(0, |(_, points)| *points);

        sorted
            .into_iter()
            .enumerate()
            .map(|(index, (name, points))| RankedEntry {
                name,
                points,
                position: index + 1,
                champion: points == top_score,
            })
            .collect_vec()
    }

    /// Gets or computes the final standings, cached for repeated access
    pub fn final_standings(&self) -> &[RankedEntry] {
        self.final_standings.get_or_init(|| self.standings())
    }
}
