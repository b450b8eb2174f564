// Deck Rankings - Web Server
// REST API with Axum over the shared DeckStore

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use deck_rankings::{pick_matchup, rank, Deck, DeckStore, StoreError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<DeckStore>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Map each store error to its own status code.
fn status_for(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) | StoreError::InsufficientData => StatusCode::NOT_FOUND,
        StoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        StoreError::SamplerTimeout => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Persistence(_) | StoreError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response<T: Serialize>(err: StoreError) -> axum::response::Response {
    if !err.is_client_error() {
        eprintln!("Request failed: {}", err);
    }
    (status_for(&err), Json(ApiResponse::<T>::err(err.to_string()))).into_response()
}

/// Matchup payload: two full deck records awaiting a vote.
#[derive(Serialize)]
struct MatchupResponse {
    deck1: Deck,
    deck2: Deck,
}

#[derive(Deserialize)]
struct VoteParams {
    winner_id: i64,
    loser_id: i64,
}

#[derive(Deserialize)]
struct AddDeckRequest {
    name: String,
    owner: String,
    #[serde(default)]
    commanders: Vec<String>,
}

#[derive(Serialize)]
struct AddDeckResponse {
    id: i64,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/leaderboard - All decks sorted by net score
async fn get_leaderboard(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    Json(rank(store.all_decks()))
}

/// GET /api/get_new_matchup - Two decks picked by the weighted sampler
async fn get_new_matchup(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    let decks = store.all_decks();

    let (first, second) = match pick_matchup(&decks, &mut rand::thread_rng()) {
        Ok(pair) => pair,
        Err(err) => return error_response::<MatchupResponse>(err),
    };

    // Both ids came out of the snapshot above, so the lookups cannot miss.
    let matchup = match (store.get_deck(first), store.get_deck(second)) {
        (Ok(deck1), Ok(deck2)) => MatchupResponse { deck1, deck2 },
        (Err(err), _) | (_, Err(err)) => return error_response::<MatchupResponse>(err),
    };

    (StatusCode::OK, Json(ApiResponse::ok(matchup))).into_response()
}

/// GET /api/vote?winner_id=..&loser_id=.. - Record a matchup outcome
async fn vote(
    State(state): State<AppState>,
    Query(params): Query<VoteParams>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    match store.record_outcome(params.winner_id, params.loser_id) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok(()))).into_response(),
        Err(err) => error_response::<()>(err),
    }
}

/// POST /api/add_deck - Register a new deck
async fn add_deck(
    State(state): State<AppState>,
    Json(req): Json<AddDeckRequest>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    match store.create_deck(&req.name, &req.owner, req.commanders) {
        Ok(id) => (
            StatusCode::OK,
            Json(ApiResponse::ok(AddDeckResponse { id })),
        )
            .into_response(),
        Err(err) => error_response::<AddDeckResponse>(err),
    }
}

/// GET / - Serve the voting UI
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🃏 Deck Rankings - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path =
        std::env::var("DECKS_DB").unwrap_or_else(|_| "deck_rankings.db".to_string());
    let addr = std::env::var("DECKS_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".to_string());

    let conn = Connection::open(&db_path).expect("Failed to open database");
    let store = DeckStore::open(conn).expect("Failed to initialize deck store");
    println!("✓ Database opened: {} ({} decks)", db_path, store.len());

    // Create shared state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/leaderboard", get(get_leaderboard))
        .route("/get_new_matchup", get(get_new_matchup))
        .route("/vote", get(vote))
        .route("/add_deck", post(add_deck))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/leaderboard", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
