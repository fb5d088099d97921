//! Error types for tournament and lobby operations.
//!
//! Structural errors are returned synchronously to the caller and never
//! partially mutate state. There are no fatal conditions in this crate;
//! malformed input degrades to an error value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during tournament operations
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TournamentError {
    #[error("need at least 2 players with non-empty names")]
    InsufficientParticipants,
    #[error("tournament already in progress")]
    AlreadyStarted,
    #[error("tournament has not been started")]
    NotStarted,
}

/// Errors that can occur during lobby operations
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum LobbyError {
    #[error("player {0} is not registered")]
    UnknownPlayer(String),
}
