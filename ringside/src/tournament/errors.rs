//! Tournament error types.

use super::models::TournamentId;
use crate::auth::PermissionError;
use crate::store::StoreError;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Bracket needs {expected} participant slots, got {actual}")]
    InvalidParticipantCount { expected: usize, actual: usize },

    #[error("Insufficient participants: need {needed}, have {available}")]
    NotEnoughParticipants { needed: usize, available: usize },

    #[error("Boxer {0} appears more than once in the bracket")]
    DuplicateParticipant(String),

    #[error("Match {0} has no entrants")]
    EmptyMatch(String),

    #[error("Boxer {winner_id} is not an entrant of {match_id}")]
    WinnerNotInMatch { match_id: String, winner_id: String },

    #[error("Match {0} is still waiting for an opponent")]
    MatchNotReady(String),

    #[error("Cannot change {match_id}: {successor_id} is already completed")]
    MatchLocked {
        match_id: String,
        successor_id: String,
    },

    #[error("Malformed bracket: {0}")]
    BracketInvariant(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl TournamentError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Store(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;
