//! Tournament lifecycle handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use matchmaking::{Bracket, TournamentPhase};
use serde::Serialize;

use super::{Ack, AppState, ErrorResponse, tournament_error};
use crate::metrics;

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub status: &'static str,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub bracket: Bracket,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub started: bool,
    pub completed: bool,
    pub player_count: usize,
    pub started_at: Option<DateTime<Utc>>,
}

/// Start a tournament from the currently registered players.
///
/// Builds the bracket, stores it as the live tournament, and returns the
/// initial snapshot. The whole operation runs under the write guard, so a
/// concurrent reset or result cannot land halfway through.
///
/// # Errors
///
/// - `400 Bad Request`: fewer registered players than the configured
///   minimum, or too few valid names to build a bracket
/// - `409 Conflict`: a tournament is already running
pub async fn start_tournament(
    State(state): State<AppState>,
) -> Result<Json<StartResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut core = state.write();

    let names = core.lobby.names();
    if names.len() < state.min_participants {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "need at least {} registered players to start",
                    state.min_participants
                ),
            }),
        ));
    }

    let bracket = core
        .tournament
        .start(&names)
        .map_err(tournament_error)?
        .clone();
    let started_at = core.tournament.started_at();
    drop(core);

    metrics::tournament_started(bracket.participants.len());

    Ok(Json(StartResponse {
        status: "started",
        started_at,
        bracket,
    }))
}

/// Discard the tournament and return to the lobby. Idempotent.
///
/// Player registrations and the score ledger survive a reset.
pub async fn reset_tournament(State(state): State<AppState>) -> Json<Ack> {
    let mut core = state.write();
    core.tournament.reset();
    drop(core);

    metrics::tournament_reset();
    Json(Ack { status: "reset" })
}

/// Lifecycle snapshot for the lobby page.
///
/// # Response
///
/// ```json
/// {"started": true, "completed": false, "player_count": 5, "started_at": "2026-01-09T18:00:00Z"}
/// ```
pub async fn tournament_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let core = state.read();
    Json(StatusResponse {
        started: core.tournament.is_started(),
        completed: core.tournament.phase() == TournamentPhase::Completed,
        player_count: core.lobby.len(),
        started_at: core.tournament.started_at(),
    })
}

/// The live bracket while a tournament runs, otherwise an ephemeral
/// preview built from the registered players.
///
/// # Errors
///
/// - `400 Bad Request`: too few registered players to preview a bracket
pub async fn bracket_data(
    State(state): State<AppState>,
) -> Result<Json<Bracket>, (StatusCode, Json<ErrorResponse>)> {
    let core = state.read();
    let candidates = core.lobby.names();
    let bracket = core
        .tournament
        .bracket_view(&candidates)
        .map_err(tournament_error)?;
    Ok(Json(bracket))
}
