//! Betting and settlement error types.

use super::models::{BetId, BetStatus, PoolStatus};
use crate::auth::PermissionError;
use crate::store::StoreError;
use thiserror::Error;

/// Bet placement and pool errors
#[derive(Debug, Error)]
pub enum BettingError {
    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Bet amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Bet amount {amount} outside allowed range {min}..={max}")]
    StakeOutOfRange { amount: i64, min: i64, max: i64 },

    #[error("Betting is disabled")]
    BettingDisabled,

    #[error("No betting pool for fight card {0}")]
    PoolNotFound(String),

    #[error("Betting pool already exists for fight card {0}")]
    PoolAlreadyExists(String),

    #[error("Betting pool {pool_id} is {status}, not open")]
    PoolNotOpen { pool_id: String, status: PoolStatus },

    #[error("Invalid pool transition: {from} -> {to}")]
    InvalidTransition { from: PoolStatus, to: PoolStatus },

    #[error("Fight card not found: {0}")]
    CardNotFound(String),

    #[error("Fight card {0} is already completed")]
    CardCompleted(String),

    #[error("Bout {0} is not in the betting pool")]
    BoutNotInPool(String),

    #[error("Boxer {fighter_id} does not fight in bout {bout_id}")]
    FighterNotInBout { fighter_id: String, bout_id: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl BettingError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            BettingError::Store(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Settlement errors
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("No valid bets to settle")]
    EmptyBatch,

    #[error("State ID verification incomplete for: {}", .unverified.join(", "))]
    VerificationIncomplete { unverified: Vec<String> },

    #[error("Bet not found: {0}")]
    BetNotFound(BetId),

    #[error("Bet {bet_id} is already {status}")]
    BetNotPending { bet_id: BetId, status: BetStatus },

    #[error(transparent)]
    Betting(#[from] BettingError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl SettlementError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            SettlementError::Store(e) => e.client_message(),
            SettlementError::Betting(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

pub type BettingResult<T> = Result<T, BettingError>;
pub type SettlementResult<T> = Result<T, SettlementError>;
