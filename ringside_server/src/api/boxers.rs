//! Roster endpoints.

use axum::{Json, extract::State};
use ringside::roster::Boxer;
use ringside::store;
use ringside::tournament;

use super::{ApiError, AppState};

/// The 32 best-ranked boxers in seed order.
///
/// Fewer are returned when the roster is smaller.
pub async fn top_32(State(state): State<AppState>) -> Result<Json<Vec<Boxer>>, ApiError> {
    let boxers: Vec<Boxer> = store::fetch_all(state.store.as_ref()).await?;
    Ok(Json(tournament::top_32(&boxers).into_iter().cloned().collect()))
}
