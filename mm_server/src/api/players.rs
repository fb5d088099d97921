//! Player registration and match-request handlers.
//!
//! Game clients register here with the address their peers should dial,
//! poll for incoming match requests, and discover each other through the
//! player list. The registered pool doubles as the tournament candidate
//! list.

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use matchmaking::Username;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::{Ack, AppState, ErrorResponse};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub username: Username,
    /// Port the player's game client listens on.
    pub port: u16,
    /// Optional host override for clients announcing a NAT'd address;
    /// defaults to the peer address of the connection.
    pub host: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListItem {
    pub username: Username,
    pub host: String,
    pub port: u16,
    pub joined: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    pub from: Username,
    pub to: Username,
}

#[derive(Debug, Serialize)]
pub struct RequestCheckResponse {
    pub request_from: Option<Username>,
}

/// Register a player, or refresh an existing registration.
///
/// # Response
///
/// ```json
/// {"status": "connected"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: blank username
pub async fn join(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<Ack>, (StatusCode, Json<ErrorResponse>)> {
    if request.username.is_blank() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "username must not be blank".to_string(),
            }),
        ));
    }

    let host = request.host.unwrap_or_else(|| peer.ip().to_string());

    let mut core = state.write();
    core.lobby.join(request.username.clone(), host, request.port);
    core.ledger.ensure_player(&request.username);
    let registered = core.lobby.len();
    drop(core);

    metrics::player_joined();
    metrics::registered_players(registered);

    Ok(Json(Ack {
        status: "connected",
    }))
}

/// List all registered players with their peer addresses, in join order.
pub async fn list_players(State(state): State<AppState>) -> Json<Vec<PlayerListItem>> {
    let core = state.read();
    let items = core
        .lobby
        .entries()
        .into_iter()
        .map(|entry| PlayerListItem {
            username: entry.name,
            host: entry.host,
            port: entry.port,
            joined: entry.joined,
        })
        .collect();
    Json(items)
}

/// Send a match request to another registered player.
///
/// The request is stored on the target and delivered when they next poll
/// [`check_requests`]; a newer request replaces an older undelivered one.
///
/// # Errors
///
/// - `404 Not Found`: target player is not registered
pub async fn propose_match(
    State(state): State<AppState>,
    Json(request): Json<ProposeRequest>,
) -> Result<Json<Ack>, (StatusCode, Json<ErrorResponse>)> {
    let mut core = state.write();
    core.lobby
        .propose(&request.from, &request.to)
        .map_err(|e| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;
    drop(core);

    metrics::match_proposed();
    Ok(Json(Ack { status: "sent" }))
}

/// Collect the pending match request for a player, if any.
///
/// Delivery is one-shot: the request is removed as it is returned.
///
/// # Response
///
/// ```json
/// {"request_from": "alice"}
/// ```
pub async fn check_requests(
    State(state): State<AppState>,
    Path(username): Path<Username>,
) -> Json<RequestCheckResponse> {
    let mut core = state.write();
    Json(RequestCheckResponse {
        request_from: core.lobby.take_request(&username),
    })
}
