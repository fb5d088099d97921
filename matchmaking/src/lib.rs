//! # Matchmaking
//!
//! A single-elimination tournament matchmaking library.
//!
//! This library provides the core of an ad-hoc online tournament server:
//! a bracket builder that turns an arbitrary player pool into a balanced
//! single-elimination tree, and a progression engine that advances winners
//! through that tree as match results are reported.
//!
//! ## Architecture
//!
//! The crate is layered strictly by dependency:
//!
//! - **Bracket builder** ([`bracket`]): a pure function from a list of
//!   display names to an initial bracket (stage, participants, matches).
//!   Non-power-of-two pools are padded with byes.
//! - **Progression engine** ([`tournament`]): owns the single live
//!   tournament's mutable bracket, applies result events, and answers
//!   structural queries. Moves through `NotStarted`, `InProgress`, and
//!   `Completed`.
//! - **Player registry** ([`lobby`]): in-memory presence tracking and
//!   peer-to-peer match requests; the candidate pool for tournament starts.
//! - **Score ledger** ([`ledger`]): per-player win counts and match history,
//!   maintained alongside (never instead of) the bracket.
//!
//! All state is in-memory and process-lifetime; callers provide their own
//! synchronization around the engine (a single lock over the whole state is
//! sufficient, since every operation is a fast synchronous function).
//!
//! ## Example
//!
//! ```
//! use matchmaking::{Username, bracket};
//!
//! let names: Vec<Username> = ["alice", "bob", "carol"]
//!     .iter()
//!     .map(|n| Username::new(n))
//!     .collect();
//!
//! // 3 players pad up to 4 slots: 2 first-round matches plus a final.
//! let bracket = bracket::build(&names).expect("enough players");
//! assert_eq!(bracket.matches.len(), 3);
//! ```

/// Bracket data model and the bracket builder.
pub mod bracket;
/// Error taxonomy for tournament and lobby operations.
pub mod errors;
/// Per-player win counts and match history.
pub mod ledger;
/// Player presence registry and match requests.
pub mod lobby;
/// The bracket progression engine.
pub mod tournament;

pub use bracket::entities::{
    Bracket, BracketMatch, MatchStatus, Opponent, Participant, SlotResult, Stage, Username,
};
pub use errors::{LobbyError, TournamentError};
pub use ledger::{RecordedMatch, ScoreLedger};
pub use lobby::{PlayerEntry, PlayerRegistry};
pub use tournament::{RecordOutcome, TournamentEngine, TournamentPhase};
