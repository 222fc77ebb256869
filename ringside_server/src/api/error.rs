//! Mapping of domain errors onto HTTP responses.
//!
//! Every failure leaves the server as `{"error": "..."}` with a status code:
//! 403 for permissions, 404 for missing documents, 409 for state conflicts,
//! 422 for validation and 500 for storage faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ringside::auth::PermissionError;
use ringside::betting::{BettingError, SettlementError};
use ringside::fight_card::ResultsError;
use ringside::store::StoreError;
use ringside::tournament::TournamentError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        Self::new(StatusCode::FORBIDDEN, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
            StoreError::MissingId(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Database(_) | StoreError::Serialization(_) => {
                tracing::error!("Store failure: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.client_message())
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        let status = match &err {
            TournamentError::Permission(_) => StatusCode::FORBIDDEN,
            TournamentError::NotFound(_) => StatusCode::NOT_FOUND,
            TournamentError::MatchLocked { .. } | TournamentError::MatchNotReady(_) => {
                StatusCode::CONFLICT
            }
            TournamentError::InvalidParticipantCount { .. }
            | TournamentError::NotEnoughParticipants { .. }
            | TournamentError::DuplicateParticipant(_)
            | TournamentError::EmptyMatch(_)
            | TournamentError::WinnerNotInMatch { .. }
            | TournamentError::BracketInvariant(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TournamentError::Store(_) => return Self::from_store_message(err.client_message()),
        };
        Self::new(status, err.client_message())
    }
}

impl From<ResultsError> for ApiError {
    fn from(err: ResultsError) -> Self {
        let status = match &err {
            ResultsError::Permission(_) => StatusCode::FORBIDDEN,
            ResultsError::CardNotFound(_) => StatusCode::NOT_FOUND,
            ResultsError::AlreadyCompleted(_) => StatusCode::CONFLICT,
            ResultsError::DuplicateDecision(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResultsError::Store(_) => return Self::from_store_message(err.client_message()),
        };
        Self::new(status, err.client_message())
    }
}

impl From<BettingError> for ApiError {
    fn from(err: BettingError) -> Self {
        let status = match &err {
            BettingError::Permission(_) => StatusCode::FORBIDDEN,
            BettingError::PoolNotFound(_) | BettingError::CardNotFound(_) => StatusCode::NOT_FOUND,
            BettingError::BettingDisabled
            | BettingError::PoolAlreadyExists(_)
            | BettingError::PoolNotOpen { .. }
            | BettingError::InvalidTransition { .. }
            | BettingError::CardCompleted(_) => StatusCode::CONFLICT,
            BettingError::InvalidAmount(_)
            | BettingError::StakeOutOfRange { .. }
            | BettingError::BoutNotInPool(_)
            | BettingError::FighterNotInBout { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BettingError::Store(_) => return Self::from_store_message(err.client_message()),
        };
        Self::new(status, err.client_message())
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        let status = match err {
            SettlementError::Betting(inner) => return inner.into(),
            SettlementError::Permission(_) => StatusCode::FORBIDDEN,
            SettlementError::BetNotFound(_) => StatusCode::NOT_FOUND,
            SettlementError::BetNotPending { .. } => StatusCode::CONFLICT,
            SettlementError::EmptyBatch | SettlementError::VerificationIncomplete { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SettlementError::Store(ref e) => {
                return Self::from_store_message(e.client_message());
            }
        };
        Self::new(status, err.client_message())
    }
}

impl ApiError {
    /// Store failures wrapped in a domain error are reported as server faults
    fn from_store_message(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}
