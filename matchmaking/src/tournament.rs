//! The bracket progression engine.
//!
//! Owns the single live tournament's mutable bracket, applies match-result
//! events, and answers structural queries. Every operation is a fast,
//! synchronous, total function of current state plus input; callers that
//! share an engine across threads must hold one exclusive boundary around
//! each mutating call as a whole (the engine performs multi-step
//! read-modify-write sequences that must not interleave).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bracket::entities::{Bracket, MatchId, MatchStatus, Opponent, SlotResult, Username};
use crate::bracket::{self, DEFAULT_STAGE_NAME};
use crate::errors::TournamentError;

/// Lifecycle of a tournament instance.
///
/// `Completed` is reached when the final match's winner is recorded;
/// `reset` returns to `NotStarted` from any phase.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// What a recorded result did to the bracket.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RecordOutcome {
    /// The winner was marked in `match_id` and advanced into
    /// `next_match_id`.
    Advanced {
        match_id: MatchId,
        next_match_id: MatchId,
    },
    /// The winner was marked in the final match; the tournament is over.
    Champion { match_id: MatchId },
    /// No open bracket match references the winner; the result belongs to a
    /// freelance match and the bracket was left untouched.
    Unmatched,
}

/// The progression engine: one live tournament, owned mutably.
#[derive(Debug)]
pub struct TournamentEngine {
    stage_name: String,
    phase: TournamentPhase,
    bracket: Option<Bracket>,
    started_at: Option<DateTime<Utc>>,
}

impl Default for TournamentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentEngine {
    pub fn new() -> Self {
        Self::with_stage_name(DEFAULT_STAGE_NAME)
    }

    pub fn with_stage_name(stage_name: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            phase: TournamentPhase::NotStarted,
            bracket: None,
            started_at: None,
        }
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    /// True from `start` until `reset`, including after completion.
    pub fn is_started(&self) -> bool {
        self.phase != TournamentPhase::NotStarted
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    /// Start a tournament from the given candidate pool.
    ///
    /// Valid only from `NotStarted`; fails with `AlreadyStarted` otherwise
    /// and with `InsufficientParticipants` when the pool is too small.
    /// Neither failure mutates state.
    pub fn start(&mut self, names: &[Username]) -> Result<&Bracket, TournamentError> {
        if self.phase != TournamentPhase::NotStarted {
            return Err(TournamentError::AlreadyStarted);
        }

        let bracket = bracket::build_named(names, &self.stage_name)?;
        log::info!(
            "tournament started: {} participants, {} matches",
            bracket.participants.len(),
            bracket.matches.len()
        );

        self.started_at = Some(Utc::now());
        self.phase = TournamentPhase::InProgress;
        Ok(&*self.bracket.insert(bracket))
    }

    /// Apply a match result to the bracket.
    ///
    /// Scans matches in round order, then positional order, for the first
    /// match with no winner yet whose opponents include `winner`, marks that
    /// slot `"win"`, and advances the winner into the next round's match at
    /// position `⌊position/2⌋` (first empty slot, `opponent1` before
    /// `opponent2`). The advancing entry carries the name only.
    ///
    /// A result that matches no open match is accepted as a freelance
    /// result and returns [`RecordOutcome::Unmatched`] without touching the
    /// bracket — including before any tournament has started. Duplicate
    /// submissions therefore never double-mark a match: the second call
    /// either resolves a different open match or no-ops.
    pub fn record_result(&mut self, winner: &Username, loser: &Username) -> RecordOutcome {
        let Some(bracket) = self.bracket.as_mut() else {
            log::debug!("result {winner} over {loser} ignored: no live bracket");
            return RecordOutcome::Unmatched;
        };

        let Some(index) = bracket
            .matches
            .iter()
            .position(|m| !m.has_winner() && m.involves(winner))
        else {
            log::debug!("result {winner} over {loser} ignored: no open match for winner");
            return RecordOutcome::Unmatched;
        };

        let (match_id, round) = {
            let m = &mut bracket.matches[index];
            for slot in [&mut m.opponent1, &mut m.opponent2] {
                if let Some(opponent) = slot.as_mut().filter(|o| o.name == *winner) {
                    opponent.result = Some(SlotResult::Win);
                    break;
                }
            }
            m.status = MatchStatus::Completed;
            (m.id, m.round)
        };

        // Two sibling matches in a round always feed the same next-round
        // match: position 2k and 2k+1 both map to position k.
        let first_in_round = bracket
            .matches
            .iter()
            .position(|m| m.round == round)
            .unwrap_or(index);
        let next_position = (index - first_in_round) / 2;

        let destination = bracket
            .matches
            .iter_mut()
            .filter(|m| m.round == round + 1)
            .nth(next_position);

        match destination {
            Some(next) => {
                // Write-once: a filled slot is never overwritten.
                if next.opponent1.is_none() {
                    next.opponent1 = Some(Opponent::advancing(winner.clone()));
                } else if next.opponent2.is_none() {
                    next.opponent2 = Some(Opponent::advancing(winner.clone()));
                }
                log::debug!("{winner} won match {match_id}, advances to match {}", next.id);
                RecordOutcome::Advanced {
                    match_id,
                    next_match_id: next.id,
                }
            }
            None => {
                self.phase = TournamentPhase::Completed;
                log::info!("{winner} won the final (match {match_id}), tournament complete");
                RecordOutcome::Champion { match_id }
            }
        }
    }

    /// Discard the tournament and return to `NotStarted`. Idempotent.
    pub fn reset(&mut self) {
        self.bracket = None;
        self.started_at = None;
        self.phase = TournamentPhase::NotStarted;
        log::info!("tournament reset");
    }

    /// The live bracket while a tournament is running, otherwise an
    /// ephemeral preview built fresh from the candidate pool.
    ///
    /// The preview path re-seeds on every call and never touches engine
    /// state; it exists so a lobby can show a plausible bracket before
    /// commit.
    pub fn bracket_view(&self, candidates: &[Username]) -> Result<Bracket, TournamentError> {
        match &self.bracket {
            Some(live) => Ok(live.clone()),
            None => bracket::build_named(candidates, &self.stage_name),
        }
    }
}
