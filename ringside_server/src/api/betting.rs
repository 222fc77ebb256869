//! Betting desk API handlers.
//!
//! Place a bet:
//! ```bash
//! curl -X POST http://localhost:7070/api/v1/bets \
//!   -H "x-ringside-role: cashier" \
//!   -H "Content-Type: application/json" \
//!   -d '{"bettorId": "p-12", "bettorName": "Pat Doe", "bettorStateId": "NV-5521",
//!        "fightCardId": "card-7", "boutId": "main", "fighterId": "ali", "amount": 2500}'
//! ```
//!
//! Settle everything that can be settled:
//! ```bash
//! curl -X POST http://localhost:7070/api/v1/bets/settle \
//!   -H "x-ringside-role: cashier" \
//!   -H "Content-Type: application/json" \
//!   -d '{"verifications": {"p-12": "nv-5521"}}'
//! ```

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use ringside::auth::{Permission, Permissions, Role};
use ringside::betting::{
    Bet, BetSlip, BettingPool, OddsFormat, OddsQuote, SettlementCandidate, SettlementError,
    StateIdVerification,
};
use serde::{Deserialize, Serialize};

use super::request_id::RequestId;
use super::{ApiError, AppState};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsParams {
    pub boxer_id: String,
    pub fight_card_id: String,
    /// `american`, `decimal` or `fractional`; defaults to the app setting
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsResponse {
    pub boxer_id: String,
    pub fight_card_id: String,
    /// No pool or no bout for this boxer yet
    pub pending: bool,
    #[serde(flatten)]
    pub quote: Option<OddsQuote>,
}

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    #[serde(default)]
    pub verifications: StateIdVerification,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettleResponse {
    pub settled: Vec<Bet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoidRequest {
    #[serde(default)]
    pub reason: String,
}

pub async fn get_pool(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<BettingPool>, ApiError> {
    Ok(Json(state.betting.pool_for_card(&card_id).await?))
}

pub async fn open_pool(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Path(card_id): Path<String>,
) -> Result<(StatusCode, Json<BettingPool>), ApiError> {
    let pool = state.betting.open_pool(&permissions, &card_id).await?;
    Ok((StatusCode::CREATED, Json(pool)))
}

pub async fn lock_pool(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Path(card_id): Path<String>,
) -> Result<Json<BettingPool>, ApiError> {
    Ok(Json(state.betting.lock_pool(&permissions, &card_id).await?))
}

/// Current odds for one boxer on one card.
///
/// Responds `200` with `"pending": true` while no odds exist yet.
pub async fn current_odds(
    State(state): State<AppState>,
    Query(params): Query<OddsParams>,
) -> Result<Json<OddsResponse>, ApiError> {
    let format = params
        .format
        .as_deref()
        .map(str::parse::<OddsFormat>)
        .transpose()
        .map_err(ApiError::unprocessable)?;

    let quote = state
        .betting
        .current_odds(&params.boxer_id, &params.fight_card_id, format)
        .await?;

    Ok(Json(OddsResponse {
        boxer_id: params.boxer_id,
        fight_card_id: params.fight_card_id,
        pending: quote.is_none(),
        quote,
    }))
}

/// Take a bet at the current odds.
///
/// # Errors
///
/// - `409 Conflict`: betting disabled, pool locked or card completed
/// - `422 Unprocessable Entity`: bad amount, bout or fighter
pub async fn place_bet(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Json(slip): Json<BetSlip>,
) -> Result<(StatusCode, Json<Bet>), ApiError> {
    let bet = state.betting.place_bet(&permissions, &slip).await?;
    metrics::bet_placed(bet.amount);
    Ok((StatusCode::CREATED, Json(bet)))
}

pub async fn get_bet(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Path(bet_id): Path<String>,
) -> Result<Json<Bet>, ApiError> {
    permissions.require(Permission::PlaceBets)?;
    Ok(Json(state.betting.get_bet(&bet_id).await?))
}

/// Bets that can be settled now, with `didWin` for display.
pub async fn pending_settlements(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
) -> Result<Json<Vec<SettlementCandidate>>, ApiError> {
    permissions.require(Permission::SettleBets)?;
    Ok(Json(state.betting.pending_settlements().await?))
}

/// Settle every eligible bet.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: nothing to settle, or some bettor's state ID
///   was not re-typed correctly
pub async fn settle_bets(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Extension(role): Extension<Role>,
    request_id: RequestId,
    Json(request): Json<SettleRequest>,
) -> Result<Json<SettleResponse>, ApiError> {
    let settled = match state
        .betting
        .settle_all(&permissions, &request.verifications)
        .await
    {
        Ok(settled) => settled,
        Err(err) => {
            let reason = match &err {
                SettlementError::EmptyBatch => "empty_batch",
                SettlementError::VerificationIncomplete { .. } => "unverified",
                SettlementError::Permission(_) => "permission",
                _ => "error",
            };
            metrics::settlement_refused_total(reason);
            return Err(err.into());
        }
    };

    metrics::bets_settled_total(settled.len());
    logging::log_audit_event(
        request_id.as_str(),
        "settle_bets",
        &role.to_string(),
        "batch",
        &format!("{} bets settled", settled.len()),
    );
    Ok(Json(SettleResponse { settled }))
}

pub async fn cancel_bet(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Extension(role): Extension<Role>,
    request_id: RequestId,
    Path(bet_id): Path<String>,
    Json(request): Json<VoidRequest>,
) -> Result<Json<Bet>, ApiError> {
    let bet = state
        .betting
        .cancel_bet(&permissions, &bet_id, &request.reason)
        .await?;
    logging::log_audit_event(
        request_id.as_str(),
        "cancel_bet",
        &role.to_string(),
        &bet_id,
        &request.reason,
    );
    Ok(Json(bet))
}

pub async fn refund_bet(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Extension(role): Extension<Role>,
    request_id: RequestId,
    Path(bet_id): Path<String>,
    Json(request): Json<VoidRequest>,
) -> Result<Json<Bet>, ApiError> {
    let bet = state
        .betting
        .refund_bet(&permissions, &bet_id, &request.reason)
        .await?;
    logging::log_audit_event(
        request_id.as_str(),
        "refund_bet",
        &role.to_string(),
        &bet_id,
        &request.reason,
    );
    Ok(Json(bet))
}
