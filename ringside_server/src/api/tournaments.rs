//! Tournament API handlers.
//!
//! ```bash
//! curl -X POST http://localhost:7070/api/v1/tournaments \
//!   -H "x-ringside-role: commissioner" \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Golden Gloves", "seedingMethod": "ranked"}'
//! ```

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ringside::auth::{Permissions, Role};
use ringside::tournament::{SeedingMethod, Tournament};
use serde::Deserialize;

use super::request_id::RequestId;
use super::{ApiError, AppState};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub name: String,
    /// Defaults to `ranked`
    pub seeding_method: Option<SeedingMethod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub match_id: String,
    pub winner_id: String,
}

/// Build a bracket from the current roster.
///
/// # Errors
///
/// - `403 Forbidden`: role lacks `manage_tournaments`
/// - `422 Unprocessable Entity`: empty name or fewer than 16 boxers
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::unprocessable("Tournament name is required"));
    }
    let method = request.seeding_method.unwrap_or(SeedingMethod::Ranked);

    let tournament = state
        .tournaments
        .create_tournament(&permissions, name.to_string(), method)
        .await?;

    metrics::tournaments_created_total(&method.to_string());
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.list_tournaments().await?))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.get_tournament(&id).await?))
}

/// Record a match winner.
///
/// An unknown match id returns the tournament unchanged.
///
/// # Errors
///
/// - `404 Not Found`: no such tournament
/// - `409 Conflict`: the next match is already decided
/// - `422 Unprocessable Entity`: winner is not in the match
pub async fn advance_winner(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Extension(role): Extension<Role>,
    request_id: RequestId,
    Path(id): Path<String>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state
        .tournaments
        .advance_winner(&permissions, &id, &request.match_id, &request.winner_id)
        .await?;

    metrics::tournament_advances_total();
    logging::log_audit_event(
        request_id.as_str(),
        "advance_winner",
        &role.to_string(),
        &id,
        &format!("{} won {}", request.winner_id, request.match_id),
    );
    Ok(Json(tournament))
}
