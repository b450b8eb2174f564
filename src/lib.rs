// Deck Rankings - Core Library
// Exposes the store, sampler, and ranker for the CLI, API server, and tests

pub mod db;
pub mod error;
pub mod ranker;
pub mod sampler;
pub mod store;

// Re-export commonly used types
pub use db::{decode_commanders, encode_commanders, setup_database, Deck};
pub use error::StoreError;
pub use ranker::rank;
pub use sampler::{pick_matchup, MAX_REDRAWS};
pub use store::DeckStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
