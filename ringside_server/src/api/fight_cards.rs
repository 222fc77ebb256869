//! Fight card API handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use ringside::auth::{Permissions, Role};
use ringside::fight_card::{BoutDecision, FightCard};
use ringside::roster::Boxer;
use serde::{Deserialize, Serialize};

use super::request_id::RequestId;
use super::{ApiError, AppState};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct DeclareResultsRequest {
    pub decisions: Vec<BoutDecision>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareResultsResponse {
    pub card: FightCard,
    /// Boxers whose record changed
    pub updated_boxers: Vec<Boxer>,
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FightCard>, ApiError> {
    Ok(Json(state.fight_cards.get_card(&id).await?))
}

/// Declare the results of a card and update fight records.
///
/// # Errors
///
/// - `403 Forbidden`: role lacks `declare_results`
/// - `404 Not Found`: no such card
/// - `409 Conflict`: results were already declared
pub async fn declare_results(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Extension(role): Extension<Role>,
    request_id: RequestId,
    Path(id): Path<String>,
    Json(request): Json<DeclareResultsRequest>,
) -> Result<Json<DeclareResultsResponse>, ApiError> {
    let outcome = state
        .fight_cards
        .declare_results(&permissions, &id, &request.decisions)
        .await?;

    metrics::results_declared_total();
    logging::log_audit_event(
        request_id.as_str(),
        "declare_results",
        &role.to_string(),
        &id,
        &format!(
            "{} decisions, {} boxers updated",
            request.decisions.len(),
            outcome.touched.len()
        ),
    );

    let updated_boxers = outcome.touched_boxers().cloned().collect();
    Ok(Json(DeclareResultsResponse {
        card: outcome.card,
        updated_boxers,
    }))
}
