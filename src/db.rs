use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered deck with its running matchup tally.
///
/// Field names on the wire match the original ranking service so the
/// bundled UI (and any existing client) keeps working unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: i64,

    pub name: String,

    pub owner: String,

    /// Commander names in the order they were registered. May be empty.
    pub commanders: Vec<String>,

    #[serde(rename = "n_matchups_won")]
    pub wins: i64,

    #[serde(rename = "n_matchups_lost")]
    pub losses: i64,
}

impl Deck {
    /// Ranking key: wins minus losses. May be negative.
    pub fn net_score(&self) -> i64 {
        self.wins - self.losses
    }

    /// Total recorded matchups, the basis of the inverse sampling weight.
    pub fn total_votes(&self) -> i64 {
        self.wins + self.losses
    }
}

// ============================================================================
// Commander encoding
// ============================================================================
// The commanders column stores a JSON array. The reference service joined
// on ";" and split on read, which corrupts any commander name containing
// the delimiter; JSON is lossless for arbitrary strings. Rows written by
// the old format are still decoded via the legacy split.

pub fn encode_commanders(commanders: &[String]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(commanders)?)
}

pub fn decode_commanders(raw: &str) -> Vec<String> {
    if let Ok(commanders) = serde_json::from_str::<Vec<String>>(raw) {
        return commanders;
    }

    // Legacy ";"-joined rows. An empty column means no commanders.
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(';').map(|s| s.to_string()).collect()
    }
}

// ============================================================================
// Schema
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<(), StoreError> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS deck_rankings (
            id INTEGER PRIMARY KEY,
            deck_name TEXT NOT NULL,
            deck_owner TEXT NOT NULL,
            deck_commanders TEXT NOT NULL,
            n_matchups_won INTEGER NOT NULL DEFAULT 0,
            n_matchups_lost INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// Row operations
// ============================================================================

fn deck_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Deck> {
    let raw_commanders: String = row.get(3)?;
    Ok(Deck {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        commanders: decode_commanders(&raw_commanders),
        wins: row.get(4)?,
        losses: row.get(5)?,
    })
}

const DECK_COLUMNS: &str =
    "id, deck_name, deck_owner, deck_commanders, n_matchups_won, n_matchups_lost";

/// Insert a deck with an explicit id. The store allocates ids itself
/// (max existing + 1) so the in-memory mirror and the table always agree.
pub fn insert_deck(conn: &Connection, deck: &Deck) -> Result<(), StoreError> {
    let commanders = encode_commanders(&deck.commanders)?;

    conn.execute(
        "INSERT INTO deck_rankings (
            id, deck_name, deck_owner, deck_commanders, n_matchups_won, n_matchups_lost
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            deck.id,
            deck.name,
            deck.owner,
            commanders,
            deck.wins,
            deck.losses,
        ],
    )?;

    Ok(())
}

/// Persist the current win/loss counters for one deck.
pub fn update_tallies(conn: &Connection, deck: &Deck) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE deck_rankings SET n_matchups_won = ?1, n_matchups_lost = ?2 WHERE id = ?3",
        params![deck.wins, deck.losses, deck.id],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(deck.id));
    }

    Ok(())
}

/// Load the whole table into an id-keyed map (the startup mirror).
pub fn load_decks(conn: &Connection) -> Result<HashMap<i64, Deck>, StoreError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {} FROM deck_rankings", DECK_COLUMNS))?;

    let rows = stmt.query_map([], deck_from_row)?;

    let mut decks = HashMap::new();
    for row in rows {
        let deck = row?;
        decks.insert(deck.id, deck);
    }

    Ok(decks)
}

/// Fetch a single deck row, if present.
pub fn load_deck(conn: &Connection, id: i64) -> Result<Option<Deck>, StoreError> {
    let deck = conn
        .query_row(
            &format!("SELECT {} FROM deck_rankings WHERE id = ?1", DECK_COLUMNS),
            params![id],
            deck_from_row,
        )
        .optional()?;

    Ok(deck)
}

// ============================================================================
// TESTS
// ============================================================================
