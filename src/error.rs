// Deck Rankings - Error Taxonomy
// Typed errors for the store, sampler, and persistence layer

use thiserror::Error;

/// Errors surfaced by the deck store and the matchup sampler.
///
/// Every variant maps to a distinct failure signal at the API boundary,
/// so handlers can pick status codes without string matching.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested deck id does not exist.
    #[error("deck {0} not found")]
    NotFound(i64),

    /// The caller passed something the operation cannot accept
    /// (e.g. a deck voted against itself).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The sampler was asked for a matchup but no decks exist yet.
    #[error("no decks available for a matchup")]
    InsufficientData,

    /// The sampler could not draw two distinct decks within its retry
    /// ceiling (only one deck is effectively reachable by weight).
    #[error("could not draw two distinct decks within the retry limit")]
    SamplerTimeout,

    /// The SQLite layer failed. Fatal to the calling operation, never retried.
    #[error("persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// Commander list could not be (de)serialized for storage.
    #[error("commander encoding failure: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    /// True for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::InvalidArgument(_))
    }
}

// ============================================================================
// TESTS
// ============================================================================
