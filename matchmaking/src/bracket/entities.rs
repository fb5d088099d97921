use serde::{Deserialize, Serialize};
use std::fmt;

/// Participant ids are assigned by insertion order after seeding, starting
/// at 1.
pub type ParticipantId = u32;

/// Match ids are global across the whole bracket and monotonically
/// increasing in round order, then left-to-right within a round.
pub type MatchId = u32;

pub type StageId = u32;

/// A player's display name.
///
/// Display names are the join key for all bracket slot lookups: winners
/// advance as name-only entries, so names must be unique within a single
/// tournament's pool for results to resolve unambiguously. The builder does
/// not enforce uniqueness.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for empty or whitespace-only names, which the builder filters
    /// out of the participant pool.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The only result an opponent slot can carry.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotResult {
    Win,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Completed,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    SingleElimination,
}

/// A named container for the bracket; one stage per tournament.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StageKind,
    pub number: u32,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: Username,
}

/// An occupied opponent slot in a match.
///
/// Round-1 slots carry the seeded participant's id; advancing entries carry
/// only the winner's name. An absent slot (`None` on the match) is a bye in
/// round 1 and a not-yet-filled slot in later rounds.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Opponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ParticipantId>,
    pub name: Username,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SlotResult>,
}

impl Opponent {
    pub fn seeded(participant: &Participant) -> Self {
        Self {
            id: Some(participant.id),
            name: participant.name.clone(),
            result: None,
        }
    }

    /// A name-only entry placed into a later round's slot by a recorded win.
    pub fn advancing(name: Username) -> Self {
        Self {
            id: None,
            name,
            result: None,
        }
    }

    pub fn is_winner(&self) -> bool {
        matches!(self.result, Some(SlotResult::Win))
    }
}

/// One match in the bracket tree.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub stage_id: StageId,
    /// Rounds are contiguous starting at 1; the highest round is the final.
    pub round: u32,
    /// Always 0 for single elimination.
    pub group: u32,
    pub status: MatchStatus,
    pub opponent1: Option<Opponent>,
    pub opponent2: Option<Opponent>,
}

impl BracketMatch {
    /// A later-round match with both slots waiting on earlier results.
    pub fn unscheduled(id: MatchId, stage_id: StageId, round: u32) -> Self {
        Self {
            id,
            stage_id,
            round,
            group: 0,
            status: MatchStatus::Pending,
            opponent1: None,
            opponent2: None,
        }
    }

    /// At most one opponent slot per match may carry a win.
    pub fn has_winner(&self) -> bool {
        self.opponents().any(Opponent::is_winner)
    }

    pub fn involves(&self, name: &Username) -> bool {
        self.opponents().any(|o| &o.name == name)
    }

    pub fn opponents(&self) -> impl Iterator<Item = &Opponent> {
        self.opponent1.iter().chain(self.opponent2.iter())
    }
}

/// The full single-elimination tree for one tournament instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bracket {
    pub stage: Stage,
    pub participants: Vec<Participant>,
    pub matches: Vec<BracketMatch>,
}

impl Bracket {
    pub fn round_count(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// The single match of the highest round.
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.matches.last()
    }
}
