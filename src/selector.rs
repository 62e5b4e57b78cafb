//! Question selection for a session
//!
//! Pure functions that turn the loaded question pool and a validated
//! configuration into the ordered queue played during one session. The
//! queue is produced exactly once at session start and never mutated
//! afterwards; only the session cursor advances over it.

use enum_map::EnumMap;
use itertools::Itertools;

use crate::{
    config::{GameConfig, GameMode},
    question::{Difficulty, QuestionRecord},
};

/// Produces the ordered question queue for one session
///
/// Filters the pool to the enabled difficulty tiers and clamps the requested
/// count to the filtered pool size, so an undersized pool shortens the
/// session instead of raising. An empty filtered pool yields an empty queue
/// and thus a zero-question session.
///
/// In [`GameMode::Random`] the queue is a uniform sample without replacement,
/// reshuffled so tiers interleave arbitrarily. In [`GameMode::Progressive`]
/// the queue is built per tier in fixed order easy, medium, hard: with `n`
/// enabled tiers and `q` questions, the first `q % n` tiers receive
/// `q / n + 1` questions and the rest `q / n`, each tier drawn uniformly
/// without replacement (clamped to tier supply) and kept contiguous.
pub fn select(pool: &[QuestionRecord], config: &GameConfig) -> Vec<QuestionRecord> {
    let filtered = pool
        .iter()
        .filter(|question| config.enabled(question.difficulty()))
        .cloned()
        .collect_vec();

    let count = config.question_count().min(filtered.len());
    if count == 0 {
        return Vec::new();
    }

    match config.mode() {
        GameMode::Random => {
            let mut drawn = sample(filtered, count);
            fastrand::shuffle(&mut drawn);
            drawn
        }
        GameMode::Progressive => {
            let mut by_tier: EnumMap<Difficulty, Vec<QuestionRecord>> = EnumMap::default();
            for question in filtered {
                by_tier[question.difficulty()].push(question);
            }

            let tiers = config.enabled_tiers();
            let base = count / tiers.len();
            let remainder = count % tiers.len();

            tiers
                .iter()
                .enumerate()
                .flat_map(|(tier_index, tier)| {
                    let wanted = base + usize::from(tier_index < remainder);
                    sample(std::mem::take(&mut by_tier[*tier]), wanted)
                })
                .collect_vec()
        }
    }
}

/// Draws `amount` records uniformly at random without replacement
///
/// Returns all candidates (in random order) when fewer than `amount` exist.
fn sample(mut candidates: Vec<QuestionRecord>, amount: usize) -> Vec<QuestionRecord> {
    fastrand::shuffle(&mut candidates);
    candidates.truncate(amount);
    candidates
}
