//! Matchup selection.
//!
//! Picks two distinct decks for a new matchup, weighted toward decks that
//! have accumulated fewer total votes so coverage converges toward uniform
//! over time.

use crate::db::Deck;
use crate::error::StoreError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Retry ceiling for the distinct-pair draw. With only one deck
/// effectively reachable by weight the draw can never produce a distinct
/// pair, so the loop must bail out instead of spinning forever.
pub const MAX_REDRAWS: usize = 1000;

/// Pick two distinct deck ids for a new matchup.
///
/// Weighting: with `T` total votes across all decks, each deck gets weight
/// `1 - total_votes / T`, so under-voted decks are favored. With no votes
/// recorded yet every deck is equally likely.
///
/// Boundary cases:
/// - no decks: `InsufficientData`.
/// - one deck: the degenerate pair `(id, id)` is returned immediately;
///   callers must treat it as "no real comparison possible".
/// - colliding draws are retried up to [`MAX_REDRAWS`] times, after which
///   the call fails with `SamplerTimeout`.
pub fn pick_matchup<R: Rng + ?Sized>(
    decks: &[Deck],
    rng: &mut R,
) -> Result<(i64, i64), StoreError> {
    if decks.is_empty() {
        return Err(StoreError::InsufficientData);
    }
    if decks.len() == 1 {
        let id = decks[0].id;
        return Ok((id, id));
    }

    let total: i64 = decks.iter().map(Deck::total_votes).sum();

    // Weights lie in [0, 1) and sum to n - 1, so WeightedIndex only
    // rejects them in the degenerate cases where uniform is correct anyway.
    let weighted = if total > 0 {
        let weights: Vec<f64> = decks
            .iter()
            .map(|d| 1.0 - d.total_votes() as f64 / total as f64)
            .collect();
        WeightedIndex::new(&weights).ok()
    } else {
        None
    };

    for _ in 0..MAX_REDRAWS {
        let first = draw(decks, &weighted, rng);
        let second = draw(decks, &weighted, rng);
        if first != second {
            return Ok((first, second));
        }
    }

    Err(StoreError::SamplerTimeout)
}

fn draw<R: Rng + ?Sized>(decks: &[Deck], weighted: &Option<WeightedIndex<f64>>, rng: &mut R) -> i64 {
    let index = match weighted {
        Some(dist) => dist.sample(rng),
        None => rng.gen_range(0..decks.len()),
    };
    decks[index].id
}

// ============================================================================
// TESTS
// ============================================================================
