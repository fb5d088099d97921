//! The bracket builder: participant list in, balanced bracket out.

use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::entities::{
    Bracket, BracketMatch, MatchId, MatchStatus, Opponent, Participant, ParticipantId, Stage,
    StageId, StageKind, Username,
};
use crate::errors::TournamentError;

pub const DEFAULT_STAGE_NAME: &str = "Main";

const STAGE_ID: StageId = 1;

/// Build a single-elimination bracket from a list of display names.
///
/// Blank (empty or whitespace-only) names are filtered out; at least 2
/// distinct names must survive the filter or the build fails with
/// [`TournamentError::InsufficientParticipants`]. The surviving pool is
/// shuffled uniformly on every call, so seeding order is randomized and two
/// builds from the same pool produce differently paired brackets.
///
/// The pool is padded with byes up to the next power of two; byes occupy the
/// trailing round-1 slots and are never redrawn. A match pairing a player
/// against a bye is left without a winner; it resolves like any other match
/// once a result naming that player is recorded.
///
/// Duplicate names are not rejected. Winners advance by display name, so a
/// pool with duplicates produces ambiguous result resolution; keeping the
/// pool unique is the caller's responsibility.
pub fn build(names: &[Username]) -> Result<Bracket, TournamentError> {
    build_named(names, DEFAULT_STAGE_NAME)
}

/// [`build`] with an explicit stage name.
pub fn build_named(names: &[Username], stage_name: &str) -> Result<Bracket, TournamentError> {
    let mut pool: Vec<Username> = names.iter().filter(|n| !n.is_blank()).cloned().collect();

    let distinct: HashSet<&Username> = pool.iter().collect();
    if distinct.len() < 2 {
        return Err(TournamentError::InsufficientParticipants);
    }

    pool.shuffle(&mut rand::rng());

    let n = pool.len();
    let slots = n.next_power_of_two();
    let byes = slots - n;

    let participants: Vec<Participant> = pool
        .into_iter()
        .enumerate()
        .map(|(i, name)| Participant {
            id: (i + 1) as ParticipantId,
            name,
        })
        .collect();

    // Round 1: pair adjacent slots. Slots past the participant count are
    // byes and stay empty.
    let mut matches: Vec<BracketMatch> = Vec::with_capacity(slots - 1);
    let mut match_id: MatchId = 1;
    for pair in 0..slots / 2 {
        matches.push(BracketMatch {
            id: match_id,
            stage_id: STAGE_ID,
            round: 1,
            group: 0,
            status: MatchStatus::Pending,
            opponent1: participants.get(2 * pair).map(Opponent::seeded),
            opponent2: participants.get(2 * pair + 1).map(Opponent::seeded),
        });
        match_id += 1;
    }

    // Later rounds halve until a single final; ids keep counting up so the
    // engine can locate "the next match" positionally.
    let mut round = 1;
    let mut round_size = slots / 2;
    while round_size > 1 {
        round_size /= 2;
        round += 1;
        for _ in 0..round_size {
            matches.push(BracketMatch::unscheduled(match_id, STAGE_ID, round));
            match_id += 1;
        }
    }

    log::debug!(
        "built bracket: {n} participants, {slots} slots, {byes} byes, {} matches over {round} rounds",
        matches.len()
    );

    Ok(Bracket {
        stage: Stage {
            id: STAGE_ID,
            name: stage_name.to_string(),
            kind: StageKind::SingleElimination,
            number: 1,
        },
        participants,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<Username> {
        raw.iter().map(|n| Username::new(n)).collect()
    }

    #[test]
    fn test_five_players_pad_to_eight_slots() {
        let bracket = build(&names(&["A", "B", "C", "D", "E"])).unwrap();

        assert_eq!(bracket.participants.len(), 5);
        assert_eq!(bracket.matches.len(), 7);
        assert_eq!(bracket.round_count(), 3);
        assert_eq!(bracket.matches_in_round(1).count(), 4);
        assert_eq!(bracket.matches_in_round(2).count(), 2);
        assert_eq!(bracket.matches_in_round(3).count(), 1);

        // 3 byes: empty round-1 slots, always at the tail of the pairing.
        let empty_slots: usize = bracket
            .matches_in_round(1)
            .map(|m| 2 - m.opponents().count())
            .sum();
        assert_eq!(empty_slots, 3);
    }

    #[test]
    fn test_two_players_single_final() {
        let bracket = build(&names(&["A", "B"])).unwrap();

        assert_eq!(bracket.matches.len(), 1);
        assert_eq!(bracket.round_count(), 1);

        let only = &bracket.matches[0];
        assert!(only.opponent1.is_some());
        assert!(only.opponent2.is_some());
    }

    #[test]
    fn test_one_player_is_insufficient() {
        let err = build(&names(&["A"])).unwrap_err();
        assert_eq!(err, TournamentError::InsufficientParticipants);
    }

    #[test]
    fn test_blank_names_are_filtered() {
        let bracket = build(&names(&["A", "   ", "", "B"])).unwrap();
        assert_eq!(bracket.participants.len(), 2);
    }

    #[test]
    fn test_all_blank_is_insufficient() {
        let err = build(&names(&["", "  ", "\t"])).unwrap_err();
        assert_eq!(err, TournamentError::InsufficientParticipants);
    }

    #[test]
    fn test_two_copies_of_one_name_is_insufficient() {
        // The 2-player floor counts distinct names.
        let err = build(&names(&["A", "A"])).unwrap_err();
        assert_eq!(err, TournamentError::InsufficientParticipants);
    }

    #[test]
    fn test_duplicate_names_are_kept_in_the_pool() {
        // Uniqueness is not enforced beyond the 2-distinct floor; duplicate
        // entries each occupy a slot.
        let bracket = build(&names(&["A", "A", "B"])).unwrap();
        assert_eq!(bracket.participants.len(), 3);
    }

    #[test]
    fn test_participant_ids_follow_seeding_order() {
        let bracket = build(&names(&["A", "B", "C", "D", "E", "F"])).unwrap();

        let ids: Vec<u32> = bracket.participants.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_every_player_in_exactly_one_first_round_match() {
        let pool = names(&["A", "B", "C", "D", "E", "F", "G"]);
        let bracket = build(&pool).unwrap();

        for name in &pool {
            let appearances = bracket
                .matches_in_round(1)
                .filter(|m| m.involves(name))
                .count();
            assert_eq!(appearances, 1, "{name} should appear exactly once");
        }
    }

    #[test]
    fn test_match_ids_are_global_and_round_ordered() {
        let bracket = build(&names(&["A", "B", "C", "D", "E"])).unwrap();

        for (i, m) in bracket.matches.iter().enumerate() {
            assert_eq!(m.id, (i + 1) as u32);
        }

        let rounds: Vec<u32> = bracket.matches.iter().map(|m| m.round).collect();
        let mut sorted = rounds.clone();
        sorted.sort_unstable();
        assert_eq!(rounds, sorted, "matches must be stored in round order");
    }

    #[test]
    fn test_later_rounds_start_empty() {
        let bracket = build(&names(&["A", "B", "C", "D"])).unwrap();

        for m in bracket.matches.iter().filter(|m| m.round > 1) {
            assert!(m.opponent1.is_none());
            assert!(m.opponent2.is_none());
            assert_eq!(m.status, MatchStatus::Pending);
        }
    }

    #[test]
    fn test_no_winners_at_build_time() {
        // Byes are not auto-advanced: even a player paired against a bye
        // starts without a win marker.
        let bracket = build(&names(&["A", "B", "C"])).unwrap();
        assert!(bracket.matches.iter().all(|m| !m.has_winner()));
    }
}
