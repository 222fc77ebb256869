//! Result declaration error types.

use super::models::{BoutId, FightCardId};
use crate::auth::PermissionError;
use crate::store::StoreError;
use thiserror::Error;

/// Result declaration errors
#[derive(Debug, Error)]
pub enum ResultsError {
    /// Caller lacks the required grant
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Card results are final once declared
    #[error("Fight card {0} is already completed")]
    AlreadyCompleted(FightCardId),

    /// The same bout was decided more than once in one declaration
    #[error("Bout {0} has more than one decision")]
    DuplicateDecision(BoutId),

    /// Fight card not found
    #[error("Fight card not found: {0}")]
    CardNotFound(FightCardId),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ResultsError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            ResultsError::Store(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for result declaration
pub type ResultsResult<T> = Result<T, ResultsError>;
