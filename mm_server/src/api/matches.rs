//! Match confirmation, result reporting, and standings handlers.

use axum::{Json, extract::State};
use matchmaking::{RecordOutcome, RecordedMatch, Username};
use serde::{Deserialize, Serialize};

use super::{Ack, AppState};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct ConfirmMatchRequest {
    pub player1: Username,
    pub player2: Username,
}

#[derive(Debug, Deserialize)]
pub struct MatchResultRequest {
    pub winner: Username,
    pub loser: Username,
}

#[derive(Debug, Serialize)]
pub struct MatchResultResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    /// `[name, wins]` pairs, best first.
    pub scores: Vec<(Username, u32)>,
    pub history: Vec<RecordedMatch>,
}

/// Record that two players agreed to start a game.
///
/// Opens a history entry the next matching result will be attributed to.
/// Both tournament and freelance games are confirmed through here.
pub async fn confirm_match(
    State(state): State<AppState>,
    Json(request): Json<ConfirmMatchRequest>,
) -> Json<Ack> {
    let mut core = state.write();
    core.ledger.open_match(request.player1, request.player2);
    Json(Ack {
        status: "match_started",
    })
}

/// Report a game result.
///
/// The ledger always takes the win; the bracket is mutated only when an
/// open tournament match references the winner. A result that matches no
/// bracket match is still accepted — it belongs to a freelance game.
///
/// # Response
///
/// ```json
/// {"status": "result_recorded", "outcome": "advanced", "match_id": 2, "next_match_id": 5}
/// ```
pub async fn record_result(
    State(state): State<AppState>,
    Json(request): Json<MatchResultRequest>,
) -> Json<MatchResultResponse> {
    let mut core = state.write();
    core.ledger.record_win(&request.winner);
    let outcome = core
        .tournament
        .record_result(&request.winner, &request.loser);
    drop(core);

    metrics::result_recorded(match &outcome {
        RecordOutcome::Advanced { .. } => "advanced",
        RecordOutcome::Champion { .. } => "champion",
        RecordOutcome::Unmatched => "unmatched",
    });

    Json(MatchResultResponse {
        status: "result_recorded",
        outcome,
    })
}

/// Standings (wins, best first) and the full match history.
pub async fn scores_history(State(state): State<AppState>) -> Json<ScoresResponse> {
    let core = state.read();
    Json(ScoresResponse {
        scores: core.ledger.standings(),
        history: core.ledger.history().to_vec(),
    })
}
