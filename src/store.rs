use crate::db::{self, Deck};
use crate::error::StoreError;
use rusqlite::Connection;
use std::collections::HashMap;

/// Exclusive owner of all deck records.
///
/// Keeps an in-memory mirror of the `deck_rankings` table so reads never
/// touch SQLite, and funnels every mutation through `create_deck` /
/// `record_outcome` so memory and disk cannot drift apart. Mutations are
/// write-through: the row is durable before the call returns.
pub struct DeckStore {
    conn: Connection,
    decks: HashMap<i64, Deck>,
}

impl DeckStore {
    /// Set up the schema if needed and load the full table into memory.
    pub fn open(conn: Connection) -> Result<Self, StoreError> {
        db::setup_database(&conn)?;
        let decks = db::load_decks(&conn)?;
        Ok(Self { conn, decks })
    }

    /// Register a new deck with zero counters and return its id.
    ///
    /// Ids are allocated as max existing id + 1, starting at 1.
    pub fn create_deck(
        &mut self,
        name: &str,
        owner: &str,
        commanders: Vec<String>,
    ) -> Result<i64, StoreError> {
        let id = self.decks.keys().max().copied().unwrap_or(0) + 1;

        let deck = Deck {
            id,
            name: name.to_string(),
            owner: owner.to_string(),
            commanders,
            wins: 0,
            losses: 0,
        };

        // Persist first: a failed insert must leave the mirror untouched.
        db::insert_deck(&self.conn, &deck)?;
        self.decks.insert(id, deck);

        Ok(id)
    }

    /// Record a matchup outcome: winner gains a win, loser gains a loss.
    ///
    /// Validates both ids before touching any counter, so a failed call
    /// mutates nothing. Both row updates go through one SQLite transaction.
    pub fn record_outcome(&mut self, winner_id: i64, loser_id: i64) -> Result<(), StoreError> {
        if winner_id == loser_id {
            return Err(StoreError::InvalidArgument(format!(
                "deck {} cannot win against itself",
                winner_id
            )));
        }

        let mut winner = self
            .decks
            .get(&winner_id)
            .cloned()
            .ok_or(StoreError::NotFound(winner_id))?;
        let mut loser = self
            .decks
            .get(&loser_id)
            .cloned()
            .ok_or(StoreError::NotFound(loser_id))?;

        winner.wins += 1;
        loser.losses += 1;

        let tx = self.conn.transaction()?;
        db::update_tallies(&tx, &winner)?;
        db::update_tallies(&tx, &loser)?;
        tx.commit()?;

        self.decks.insert(winner_id, winner);
        self.decks.insert(loser_id, loser);

        Ok(())
    }

    /// Snapshot copy of every deck. Order is unspecified; ranking is the
    /// ranker's concern.
    pub fn all_decks(&self) -> Vec<Deck> {
        self.decks.values().cloned().collect()
    }

    /// Copy of one deck by id.
    pub fn get_deck(&self, id: i64) -> Result<Deck, StoreError> {
        self.decks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Give the underlying connection back (used to inspect the durable
    /// state after the store is done with it).
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> DeckStore {
        let conn = Connection::open_in_memory().unwrap();
        DeckStore::open(conn).unwrap()
    }

    fn commanders(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ids_are_strictly_increasing_from_one() {
        let mut store = test_store();

        let a = store.create_deck("Alpha", "Ann", commanders(&["Atraxa"])).unwrap();
        let b = store.create_deck("Beta", "Ben", vec![]).unwrap();
        let c = store.create_deck("Gamma", "Cam", commanders(&["Tymna", "Thrasios"])).unwrap();

        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn test_new_deck_starts_with_zero_counters() {
        let mut store = test_store();
        let id = store.create_deck("Alpha", "Ann", vec![]).unwrap();

        let deck = store.get_deck(id).unwrap();
        assert_eq!(deck.wins, 0);
        assert_eq!(deck.losses, 0);
    }

    #[test]
    fn test_record_outcome_touches_only_the_two_decks() {
        let mut store = test_store();
        let a = store.create_deck("Alpha", "Ann", vec![]).unwrap();
        let b = store.create_deck("Beta", "Ben", vec![]).unwrap();
        let c = store.create_deck("Gamma", "Cam", vec![]).unwrap();

        store.record_outcome(a, b).unwrap();

        let alpha = store.get_deck(a).unwrap();
        let beta = store.get_deck(b).unwrap();
        let gamma = store.get_deck(c).unwrap();

        assert_eq!((alpha.wins, alpha.losses), (1, 0));
        assert_eq!((beta.wins, beta.losses), (0, 1));
        assert_eq!((gamma.wins, gamma.losses), (0, 0));
    }

    #[test]
    fn test_self_vote_is_rejected_and_mutates_nothing() {
        let mut store = test_store();
        let a = store.create_deck("Alpha", "Ann", vec![]).unwrap();

        let err = store.record_outcome(a, a).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));

        let deck = store.get_deck(a).unwrap();
        assert_eq!((deck.wins, deck.losses), (0, 0));
    }

    #[test]
    fn test_unknown_id_is_not_found_and_mutates_nothing() {
        let mut store = test_store();
        let a = store.create_deck("Alpha", "Ann", vec![]).unwrap();

        let err = store.record_outcome(a, 999).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));

        let err = store.record_outcome(999, a).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));

        let deck = store.get_deck(a).unwrap();
        assert_eq!((deck.wins, deck.losses), (0, 0));
    }

    #[test]
    fn test_get_deck_absent_is_not_found() {
        let store = test_store();
        assert!(matches!(store.get_deck(1), Err(StoreError::NotFound(1))));
    }

    #[test]
    fn test_all_decks_is_a_snapshot() {
        let mut store = test_store();
        store.create_deck("Alpha", "Ann", vec![]).unwrap();
        store.create_deck("Beta", "Ben", vec![]).unwrap();

        let mut snapshot = store.all_decks();
        snapshot[0].wins = 100;

        // Mutating the snapshot must not leak into the store.
        assert!(store.all_decks().iter().all(|d| d.wins == 0));
    }

    #[test]
    fn test_mutations_are_written_through_to_sqlite() {
        let mut store = test_store();
        let a = store.create_deck("Alpha", "Ann", commanders(&["Atraxa"])).unwrap();
        let b = store.create_deck("Beta", "Ben", vec![]).unwrap();
        store.record_outcome(a, b).unwrap();

        let conn = store.into_connection();
        let rows = db::load_decks(&conn).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[&a].wins, rows[&a].losses), (1, 0));
        assert_eq!((rows[&b].wins, rows[&b].losses), (0, 1));
        assert_eq!(rows[&a].commanders, vec!["Atraxa".to_string()]);
    }

    #[test]
    fn test_open_mirrors_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        db::insert_deck(
            &conn,
            &Deck {
                id: 4,
                name: "Old Deck".to_string(),
                owner: "Olivia".to_string(),
                commanders: commanders(&["Muldrotha"]),
                wins: 6,
                losses: 2,
            },
        )
        .unwrap();

        let mut store = DeckStore::open(conn).unwrap();

        let deck = store.get_deck(4).unwrap();
        assert_eq!(deck.name, "Old Deck");
        assert_eq!((deck.wins, deck.losses), (6, 2));

        // Id allocation continues past the loaded rows.
        let next = store.create_deck("New Deck", "Nate", vec![]).unwrap();
        assert_eq!(next, 5);
    }
}
