//! Tournament bracket data models.

use crate::fight_card::Corner;
use crate::roster::BoxerId;
use crate::store::{Document, containers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tournament ID type
pub type TournamentId = String;

/// Position of a match in the bracket arena
pub type MatchIndex = usize;

/// Entrants in a full bracket
pub const BRACKET_SIZE: usize = 32;

/// Rounds needed to reduce 32 entrants to a champion
pub const TOTAL_ROUNDS: u8 = 5;

/// Matches in a 32-entrant single-elimination bracket
pub const MATCH_COUNT: usize = 31;

/// Document id of the match at an arena position (`match-1` .. `match-31`)
pub fn match_id(index: MatchIndex) -> String {
    format!("match-{}", index + 1)
}

/// Occupant of one side of a bracket match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "boxerId", rename_all = "camelCase")]
pub enum Entrant {
    /// Filled later by the winner of a feeder match
    #[default]
    Awaiting,
    /// No opponent; the other side advances without a contest
    Bye,
    Boxer(BoxerId),
}

impl Entrant {
    pub fn boxer_id(&self) -> Option<&BoxerId> {
        match self {
            Entrant::Boxer(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_boxer(&self) -> bool {
        matches!(self, Entrant::Boxer(_))
    }
}

impl From<Option<BoxerId>> for Entrant {
    fn from(slot: Option<BoxerId>) -> Self {
        slot.map_or(Entrant::Bye, Entrant::Boxer)
    }
}

/// How round-1 positions were assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedingMethod {
    Ranked,
    Random,
}

impl fmt::Display for SeedingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedingMethod::Ranked => write!(f, "ranked"),
            SeedingMethod::Random => write!(f, "random"),
        }
    }
}

/// Tournament lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Draft,
    Active,
    Completed,
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Completed,
}

/// Edge from a match to the slot its winner fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advancement {
    pub match_index: MatchIndex,
    pub slot: Corner,
}

/// One match of the bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMatch {
    pub id: String,
    /// 1..=5
    pub round: u8,
    /// 1-based within the round
    pub match_number: u8,
    pub fighter1: Entrant,
    pub fighter2: Entrant,
    /// Round 1 only
    pub seed1: Option<u8>,
    /// Round 1 only
    pub seed2: Option<u8>,
    pub winner_id: Option<BoxerId>,
    pub status: MatchStatus,
    /// Absent only for the final
    pub advances_to: Option<Advancement>,
}

impl TournamentMatch {
    pub fn entrant(&self, corner: Corner) -> &Entrant {
        match corner {
            Corner::Fighter1 => &self.fighter1,
            Corner::Fighter2 => &self.fighter2,
        }
    }

    pub fn entrant_mut(&mut self, corner: Corner) -> &mut Entrant {
        match corner {
            Corner::Fighter1 => &mut self.fighter1,
            Corner::Fighter2 => &mut self.fighter2,
        }
    }

    /// Corner holding this boxer, if any
    pub fn corner_of(&self, boxer_id: &str) -> Option<Corner> {
        [Corner::Fighter1, Corner::Fighter2]
            .into_iter()
            .find(|&corner| self.entrant(corner).boxer_id().map(String::as_str) == Some(boxer_id))
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Id of the match consuming this match's winner
    pub fn next_match_id(&self) -> Option<String> {
        self.advances_to.map(|adv| match_id(adv.match_index))
    }
}

/// Single-elimination tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub total_rounds: u8,
    /// Arena of matches, round by round; index `i` has id `match-{i+1}`
    pub matches: Vec<TournamentMatch>,
    /// Round-1 positions; `None` is a bye
    pub participants: Vec<Option<BoxerId>>,
    pub seeding_method: SeedingMethod,
    pub status: TournamentStatus,
    pub champion: Option<BoxerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    pub fn match_index(&self, match_id: &str) -> Option<MatchIndex> {
        self.matches.iter().position(|m| m.id == match_id)
    }

    pub fn get_match(&self, match_id: &str) -> Option<&TournamentMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Matches of one round in bracket order
    pub fn round(&self, round: u8) -> impl Iterator<Item = &TournamentMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    pub fn final_match(&self) -> Option<&TournamentMatch> {
        self.matches.iter().find(|m| m.advances_to.is_none())
    }

    pub fn all_completed(&self) -> bool {
        self.matches.iter().all(TournamentMatch::is_completed)
    }
}

impl Document for Tournament {
    const CONTAINER: &'static str = containers::TOURNAMENTS;

    fn id(&self) -> &str {
        &self.id
    }
}
