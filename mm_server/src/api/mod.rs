//! HTTP API for the matchmaking server.
//!
//! All endpoints speak JSON and are versioned under `/api/v1`:
//!
//! ```text
//! GET  /health                          - Server health (public)
//! POST /api/v1/players/join             - Register / refresh a player
//! GET  /api/v1/players                  - List registered players
//! POST /api/v1/matches/propose          - Send a match request
//! GET  /api/v1/matches/requests/{name}  - Collect a pending match request
//! POST /api/v1/matches/confirm          - Record a confirmed game
//! POST /api/v1/matches/result           - Report a game result
//! GET  /api/v1/scores                   - Standings and match history
//! POST /api/v1/tournament/start         - Start a tournament from the lobby
//! POST /api/v1/tournament/reset         - Discard the tournament
//! GET  /api/v1/tournament/status        - Lifecycle snapshot
//! GET  /api/v1/tournament/bracket       - Live bracket or preview
//! ```
//!
//! # Concurrency
//!
//! The registry, ledger, and progression engine live behind one
//! `RwLock`: mutating handlers hold the write guard for their whole
//! operation (the engine's result handling is a multi-step
//! read-modify-write that must not interleave, and a reset must never
//! land in the middle of it), while read-only handlers share the read
//! guard. All work inside the lock is in-memory and synchronous, so hold
//! times are short and a single lock is enough.

pub mod matches;
pub mod players;
pub mod request_id;
pub mod tournament;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use matchmaking::{PlayerRegistry, ScoreLedger, TournamentEngine, TournamentError};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

/// The mutable core shared by every handler: presence registry, score
/// ledger, and the bracket progression engine.
pub struct CoreState {
    pub lobby: PlayerRegistry,
    pub ledger: ScoreLedger,
    pub tournament: TournamentEngine,
}

/// Application state cloned into each request (cheap, Arc-backed).
#[derive(Clone)]
pub struct AppState {
    core: Arc<RwLock<CoreState>>,
    pub min_participants: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let core = CoreState {
            lobby: PlayerRegistry::new(),
            ledger: ScoreLedger::new(),
            tournament: TournamentEngine::with_stage_name(&config.tournament.stage_name),
        };
        Self {
            core: Arc::new(RwLock::new(core)),
            min_participants: config.tournament.min_participants,
        }
    }

    /// Shared guard for read-only queries.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CoreState> {
        self.core.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive guard spanning a whole mutating operation.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CoreState> {
        self.core.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Uniform error body for all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

/// Map a structural tournament error onto an HTTP status.
pub(crate) fn tournament_error(
    err: TournamentError,
) -> (axum::http::StatusCode, Json<ErrorResponse>) {
    use axum::http::StatusCode;

    let status = match err {
        TournamentError::InsufficientParticipants => StatusCode::BAD_REQUEST,
        TournamentError::AlreadyStarted | TournamentError::NotStarted => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/players/join", post(players::join))
        .route("/players", get(players::list_players))
        .route("/matches/propose", post(players::propose_match))
        .route("/matches/requests/{username}", get(players::check_requests))
        .route("/matches/confirm", post(matches::confirm_match))
        .route("/matches/result", post(matches::record_result))
        .route("/scores", get(matches::scores_history))
        .route("/tournament/start", post(tournament::start_tournament))
        .route("/tournament/reset", post(tournament::reset_tournament))
        .route("/tournament/status", get(tournament::tournament_status))
        .route("/tournament/bracket", get(tournament::bracket_data))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Everything is in-memory, so the only check is that the core lock is
/// reachable; the payload carries enough context to eyeball the server.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let core = state.read();

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "players": core.lobby.len(),
        "tournament_started": core.tournament.is_started(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
