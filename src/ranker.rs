//! Leaderboard ordering.

use crate::db::Deck;

/// Sort decks by descending net score (wins - losses).
///
/// Ties break by ascending id so the leaderboard is deterministic across
/// repeated calls on the same state.
pub fn rank(mut decks: Vec<Deck>) -> Vec<Deck> {
    decks.sort_by(|a, b| {
        b.net_score()
            .cmp(&a.net_score())
            .then(a.id.cmp(&b.id))
    });
    decks
}

// ============================================================================
// TESTS
// ============================================================================
