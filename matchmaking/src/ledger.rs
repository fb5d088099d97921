//! Score ledger: per-player win counts and match history.
//!
//! The ledger is updated alongside the bracket, never instead of it: every
//! reported result lands here whether or not it resolved a tournament
//! match, so freelance games between registered players still count toward
//! the standings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bracket::entities::Username;

/// A confirmed head-to-head game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RecordedMatch {
    pub player1: Username,
    pub player2: Username,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Username>,
}

#[derive(Debug, Default)]
pub struct ScoreLedger {
    scores: HashMap<Username, u32>,
    history: Vec<RecordedMatch>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a zero score for a player, keeping any existing tally.
    pub fn ensure_player(&mut self, name: &Username) {
        self.scores.entry(name.clone()).or_insert(0);
    }

    pub fn score(&self, name: &Username) -> u32 {
        self.scores.get(name).copied().unwrap_or(0)
    }

    /// Append an open (winnerless) history entry for a confirmed game.
    pub fn open_match(&mut self, player1: Username, player2: Username) {
        log::info!("match confirmed: {player1} vs {player2}");
        self.history.push(RecordedMatch {
            player1,
            player2,
            started_at: Utc::now(),
            winner: None,
        });
    }

    /// Credit a win and attribute it to the most recent open history entry
    /// involving the winner.
    ///
    /// The score counts even when no open entry matches (results may arrive
    /// for games that were never confirmed here).
    pub fn record_win(&mut self, winner: &Username) {
        *self.scores.entry(winner.clone()).or_insert(0) += 1;

        if let Some(open) = self
            .history
            .iter_mut()
            .rev()
            .find(|m| m.winner.is_none() && (m.player1 == *winner || m.player2 == *winner))
        {
            open.winner = Some(winner.clone());
        }
    }

    /// Players sorted by wins, highest first (ties broken by name).
    pub fn standings(&self) -> Vec<(Username, u32)> {
        let mut standings: Vec<(Username, u32)> = self
            .scores
            .iter()
            .map(|(name, wins)| (name.clone(), *wins))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        standings
    }

    pub fn history(&self) -> &[RecordedMatch] {
        &self.history
    }
}
