//! Bracket construction and winner advancement.
//!
//! The bracket is an arena of 31 matches indexed round by round:
//!
//! ```text
//! round 1: 0..16   -> round 2: 16..24 -> round 3: 24..28 -> round 4: 28..30 -> final: 30
//! ```
//!
//! Every non-final match records the successor it feeds *and the slot it
//! fills there*, so a winner always lands in the same slot regardless of the
//! order in which matches are decided.

use super::errors::{TournamentError, TournamentResult};
use super::models::{
    Advancement, BRACKET_SIZE, Entrant, MATCH_COUNT, MatchIndex, MatchStatus, SeedingMethod,
    TOTAL_ROUNDS, Tournament, TournamentMatch, TournamentStatus, match_id,
};
use crate::fight_card::Corner;
use crate::roster::BoxerId;
use chrono::Utc;
use log::{debug, info};
use std::collections::HashSet;
use uuid::Uuid;

/// Fewest boxers a bracket accepts; every round-1 match needs one
pub const MIN_ENTRANTS: usize = BRACKET_SIZE / 2;

/// Matches per round, round 1 first
const ROUND_SIZES: [usize; TOTAL_ROUNDS as usize] = [16, 8, 4, 2, 1];

/// Arena index of the first match of each round
const ROUND_STARTS: [usize; TOTAL_ROUNDS as usize] = [0, 16, 24, 28, 30];

/// Build a draft tournament from 32 ordered round-1 positions.
///
/// Empty positions are byes: the boxer facing a bye is advanced immediately.
///
/// # Errors
///
/// * `TournamentError::InvalidParticipantCount` - not exactly 32 positions
/// * `TournamentError::NotEnoughParticipants` - fewer than 16 boxers
/// * `TournamentError::DuplicateParticipant` - a boxer holds two positions
/// * `TournamentError::EmptyMatch` - a round-1 match has two byes
pub fn create_tournament_bracket(
    participants: &[Option<BoxerId>],
    method: SeedingMethod,
    name: impl Into<String>,
) -> TournamentResult<Tournament> {
    if participants.len() != BRACKET_SIZE {
        return Err(TournamentError::InvalidParticipantCount {
            expected: BRACKET_SIZE,
            actual: participants.len(),
        });
    }

    let mut seen = HashSet::new();
    for id in participants.iter().flatten() {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicateParticipant(id.clone()));
        }
    }

    if seen.len() < MIN_ENTRANTS {
        return Err(TournamentError::NotEnoughParticipants {
            needed: MIN_ENTRANTS,
            available: seen.len(),
        });
    }

    let mut matches = build_matches(participants);
    validate_structure(&matches)?;
    resolve_byes(&mut matches)?;

    let now = Utc::now();
    let tournament = Tournament {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        total_rounds: TOTAL_ROUNDS,
        matches,
        participants: participants.to_vec(),
        seeding_method: method,
        status: TournamentStatus::Draft,
        champion: None,
        created_at: now,
        updated_at: now,
    };

    info!(
        "Created {:?}-seeded bracket '{}' with {} boxers",
        method,
        tournament.name,
        seen.len()
    );

    Ok(tournament)
}

fn build_matches(participants: &[Option<BoxerId>]) -> Vec<TournamentMatch> {
    let mut matches = Vec::with_capacity(MATCH_COUNT);

    for (round_idx, &size) in ROUND_SIZES.iter().enumerate() {
        let round = round_idx as u8 + 1;

        for i in 0..size {
            let index = ROUND_STARTS[round_idx] + i;
            let advances_to = ROUND_STARTS.get(round_idx + 1).map(|&next_start| Advancement {
                match_index: next_start + i / 2,
                slot: if i % 2 == 0 {
                    Corner::Fighter1
                } else {
                    Corner::Fighter2
                },
            });

            let (fighter1, fighter2, seed1, seed2) = if round == 1 {
                (
                    Entrant::from(participants[2 * i].clone()),
                    Entrant::from(participants[2 * i + 1].clone()),
                    Some(2 * i as u8 + 1),
                    Some(2 * i as u8 + 2),
                )
            } else {
                (Entrant::Awaiting, Entrant::Awaiting, None, None)
            };

            matches.push(TournamentMatch {
                id: match_id(index),
                round,
                match_number: i as u8 + 1,
                fighter1,
                fighter2,
                seed1,
                seed2,
                winner_id: None,
                status: MatchStatus::Pending,
                advances_to,
            });
        }
    }

    matches
}

/// Check the arena shape: 31 matches, a single final at the end, each
/// non-final feeding a match of the next round, and every later-round match
/// fed by exactly two matches into distinct slots.
pub fn validate_structure(matches: &[TournamentMatch]) -> TournamentResult<()> {
    let invariant = |msg: String| Err(TournamentError::BracketInvariant(msg));

    if matches.len() != MATCH_COUNT {
        return invariant(format!("expected {MATCH_COUNT} matches, found {}", matches.len()));
    }

    let mut feeders: Vec<Vec<Corner>> = vec![Vec::new(); matches.len()];

    for (index, m) in matches.iter().enumerate() {
        if m.id != match_id(index) {
            return invariant(format!("match at position {index} has id {}", m.id));
        }

        match m.advances_to {
            None if index != MATCH_COUNT - 1 => {
                return invariant(format!("{} has no successor", m.id));
            }
            None => {}
            Some(adv) => {
                let Some(target) = matches.get(adv.match_index) else {
                    return invariant(format!("{} feeds a missing match", m.id));
                };
                if target.round != m.round + 1 {
                    return invariant(format!("{} feeds {} outside the next round", m.id, target.id));
                }
                feeders[adv.match_index].push(adv.slot);
            }
        }
    }

    for (index, slots) in feeders.iter().enumerate() {
        let round = matches[index].round;
        let ok = match round {
            1 => slots.is_empty(),
            _ => slots.len() == 2 && slots[0] != slots[1],
        };
        if !ok {
            return invariant(format!(
                "{} in round {round} has {} feeder(s)",
                matches[index].id,
                slots.len()
            ));
        }
    }

    Ok(())
}

/// Advance every round-1 boxer who faces a bye
fn resolve_byes(matches: &mut [TournamentMatch]) -> TournamentResult<()> {
    for index in ROUND_STARTS[0]..ROUND_STARTS[1] {
        let walkover = match (&matches[index].fighter1, &matches[index].fighter2) {
            (Entrant::Boxer(id), Entrant::Bye) | (Entrant::Bye, Entrant::Boxer(id)) => {
                Some(id.clone())
            }
            (Entrant::Bye, Entrant::Bye) => {
                return Err(TournamentError::EmptyMatch(matches[index].id.clone()));
            }
            _ => None,
        };

        if let Some(winner) = walkover {
            debug!("{} advances on a bye in {}", winner, matches[index].id);
            record_winner(matches, index, winner)?;
        }
    }
    Ok(())
}

/// Complete a match and place the winner in its successor slot.
///
/// A successor that is already completed is never rewritten.
fn record_winner(
    matches: &mut [TournamentMatch],
    index: MatchIndex,
    winner: BoxerId,
) -> TournamentResult<()> {
    let advances_to = matches[index].advances_to;

    if let Some(next) = advances_to
        .and_then(|adv| matches.get(adv.match_index))
        .filter(|next| next.is_completed())
    {
        return Err(TournamentError::MatchLocked {
            match_id: matches[index].id.clone(),
            successor_id: next.id.clone(),
        });
    }

    matches[index].winner_id = Some(winner.clone());
    matches[index].status = MatchStatus::Completed;

    if let Some(adv) = advances_to {
        if let Some(next) = matches.get_mut(adv.match_index) {
            *next.entrant_mut(adv.slot) = Entrant::Boxer(winner);
        }
    }
    Ok(())
}

/// Both sides known: two boxers, or a boxer facing a bye
fn is_ready(m: &TournamentMatch) -> bool {
    matches!(
        (&m.fighter1, &m.fighter2),
        (Entrant::Boxer(_), Entrant::Boxer(_))
            | (Entrant::Boxer(_), Entrant::Bye)
            | (Entrant::Bye, Entrant::Boxer(_))
    )
}

/// Record a match result and propagate the winner.
///
/// Returns a new tournament; the input is never modified. The tournament is
/// `completed` with its champion set only once every match is completed,
/// otherwise it is `active`.
///
/// An unknown `match_id` is a no-op. A completed match may be re-decided
/// while its successor is still pending; the successor slot is overwritten.
///
/// # Errors
///
/// * `TournamentError::WinnerNotInMatch` - winner is not one of the two entrants
/// * `TournamentError::MatchNotReady` - a side is still awaiting its feeder
/// * `TournamentError::MatchLocked` - successor match already completed
pub fn advance_winner(
    tournament: &Tournament,
    match_id: &str,
    winner_id: &str,
) -> TournamentResult<Tournament> {
    let Some(index) = tournament.match_index(match_id) else {
        debug!("advance_winner: no match {match_id} in {}", tournament.id);
        return Ok(tournament.clone());
    };

    let current = &tournament.matches[index];
    if current.corner_of(winner_id).is_none() {
        return Err(TournamentError::WinnerNotInMatch {
            match_id: match_id.to_string(),
            winner_id: winner_id.to_string(),
        });
    }

    if !is_ready(current) {
        return Err(TournamentError::MatchNotReady(match_id.to_string()));
    }

    let mut updated = tournament.clone();
    record_winner(&mut updated.matches, index, winner_id.to_string())?;

    if updated.all_completed() {
        updated.status = TournamentStatus::Completed;
        updated.champion = updated.final_match().and_then(|m| m.winner_id.clone());
        info!(
            "Tournament '{}' completed, champion {:?}",
            updated.name, updated.champion
        );
    } else {
        updated.status = TournamentStatus::Active;
        updated.champion = None;
    }
    updated.updated_at = Utc::now();

    Ok(updated)
}
