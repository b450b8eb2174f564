// Deck Rankings - CLI
// Maintenance commands against the local database: init, add, leaderboard

use anyhow::{bail, Result};
use deck_rankings::{rank, DeckStore};
use rusqlite::Connection;
use std::env;

fn db_path() -> String {
    env::var("DECKS_DB").unwrap_or_else(|_| "deck_rankings.db".to_string())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("init") => run_init(),
        Some("add") => run_add(&args[2..]),
        Some("leaderboard") | None => run_leaderboard(),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: deck-rankings [init | add <name> <owner> [commander...] | leaderboard]");
            std::process::exit(2);
        }
    }
}

fn open_store() -> Result<DeckStore> {
    let path = db_path();
    let conn = Connection::open(&path)?;
    let store = DeckStore::open(conn)?;
    println!("✓ Database opened: {}", path);
    Ok(store)
}

fn run_init() -> Result<()> {
    let store = open_store()?;
    println!("✓ Schema ready, {} deck(s) loaded", store.len());
    Ok(())
}

fn run_add(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!("usage: deck-rankings add <name> <owner> [commander...]");
    }

    let name = &args[0];
    let owner = &args[1];
    let commanders: Vec<String> = args[2..].to_vec();

    let mut store = open_store()?;
    let id = store.create_deck(name, owner, commanders)?;
    println!("✓ Registered deck {} ({} by {})", id, name, owner);

    Ok(())
}

fn run_leaderboard() -> Result<()> {
    let store = open_store()?;

    if store.is_empty() {
        println!("No decks registered yet.");
        return Ok(());
    }

    println!("\n🏆 Leaderboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for deck in rank(store.all_decks()) {
        println!(
            "{:>4}  {:+4}  {} ({}) — {}W/{}L [{}]",
            deck.id,
            deck.net_score(),
            deck.name,
            deck.owner,
            deck.wins,
            deck.losses,
            deck.commanders.join(", "),
        );
    }

    Ok(())
}
