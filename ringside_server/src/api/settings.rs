//! Settings API handlers.
//!
//! Both settings documents are singletons: reads fall back to defaults,
//! writes replace the whole document and refresh `updatedAt`.

use axum::{
    Json,
    extract::{Extension, State},
};
use ringside::auth::{Permission, Permissions};
use ringside::store::{AppSettings, PayoutSettings, load_settings, save_settings};

use super::{ApiError, AppState};

pub async fn get_app_settings(
    State(state): State<AppState>,
) -> Result<Json<AppSettings>, ApiError> {
    Ok(Json(load_settings(state.store.as_ref()).await?))
}

pub async fn put_app_settings(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, ApiError> {
    permissions.require(Permission::ManageSettings)?;

    if settings.min_bet <= 0 {
        return Err(ApiError::unprocessable("minBet must be positive"));
    }
    if settings.max_bet < settings.min_bet {
        return Err(ApiError::unprocessable("maxBet cannot be below minBet"));
    }

    Ok(Json(save_settings(state.store.as_ref(), settings).await?))
}

pub async fn get_payout_settings(
    State(state): State<AppState>,
) -> Result<Json<PayoutSettings>, ApiError> {
    Ok(Json(load_settings(state.store.as_ref()).await?))
}

pub async fn put_payout_settings(
    State(state): State<AppState>,
    Extension(permissions): Extension<Permissions>,
    Json(settings): Json<PayoutSettings>,
) -> Result<Json<PayoutSettings>, ApiError> {
    permissions.require(Permission::ManageSettings)?;

    if !(0.0..=1.0).contains(&settings.tax_rate) {
        return Err(ApiError::unprocessable("taxRate must be between 0 and 1"));
    }
    if settings.bonus_rate < 0.0 {
        return Err(ApiError::unprocessable("bonusRate cannot be negative"));
    }

    Ok(Json(save_settings(state.store.as_ref(), settings).await?))
}
