//! HTTP API for the boxing association core.
//!
//! # Modules
//!
//! - [`boxers`]: roster queries
//! - [`tournaments`]: bracket creation and advancement
//! - [`fight_cards`]: result declaration
//! - [`betting`]: pools, odds, bets and settlement
//! - [`settings`]: singleton application and payout settings
//! - [`middleware`]: role header resolution
//! - [`request_id`]: request correlation, logging and metrics
//!
//! # Endpoints
//!
//! ```text
//! GET  /health
//! GET  /api/v1/boxers/top32
//! GET  /api/v1/tournaments
//! POST /api/v1/tournaments                    {name, seedingMethod}
//! GET  /api/v1/tournaments/{id}
//! POST /api/v1/tournaments/{id}/advance       {matchId, winnerId}
//! GET  /api/v1/fight-cards/{id}
//! POST /api/v1/fight-cards/{id}/results       {decisions: [{boutId, winner, knockout}]}
//! GET  /api/v1/fight-cards/{id}/pool
//! POST /api/v1/fight-cards/{id}/pool          open the betting pool
//! POST /api/v1/fight-cards/{id}/pool/lock
//! GET  /api/v1/odds?boxerId&fightCardId&format
//! POST /api/v1/bets
//! GET  /api/v1/bets/{id}
//! POST /api/v1/bets/{id}/cancel               {reason}
//! POST /api/v1/bets/{id}/refund               {reason}
//! GET  /api/v1/bets/settlement
//! POST /api/v1/bets/settle                    {verifications: {bettorId: stateId}}
//! GET  /api/v1/settings/app                   (PUT to replace)
//! GET  /api/v1/settings/payout                (PUT to replace)
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ringside::store::InMemoryStore;
//! use ringside_server::api::{AppState, create_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(Arc::new(InMemoryStore::new()), "memory");
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7070").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod betting;
pub mod boxers;
pub mod error;
pub mod fight_cards;
pub mod middleware;
pub mod request_id;
pub mod settings;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use ringside::betting::BettingManager;
use ringside::fight_card::FightCardManager;
use ringside::store::{DocumentStore, containers};
use ringside::tournament::TournamentManager;
use serde_json::json;
use std::sync::Arc;

pub use error::{ApiError, ErrorResponse};

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tournaments: TournamentManager,
    pub fight_cards: FightCardManager,
    pub betting: BettingManager,
    /// Backend name reported by the health check
    pub backend: &'static str,
}

impl AppState {
    /// Build the managers over one shared store
    pub fn new(store: Arc<dyn DocumentStore>, backend: &'static str) -> Self {
        Self {
            tournaments: TournamentManager::new(store.clone()),
            fight_cards: FightCardManager::new(store.clone()),
            betting: BettingManager::new(store.clone()),
            store,
            backend,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/boxers/top32", get(boxers::top_32))
        .route(
            "/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route("/tournaments/{id}/advance", post(tournaments::advance_winner))
        .route("/fight-cards/{id}", get(fight_cards::get_card))
        .route("/fight-cards/{id}/results", post(fight_cards::declare_results))
        .route(
            "/fight-cards/{id}/pool",
            get(betting::get_pool).post(betting::open_pool),
        )
        .route("/fight-cards/{id}/pool/lock", post(betting::lock_pool))
        .route("/odds", get(betting::current_odds))
        .route("/bets", post(betting::place_bet))
        .route("/bets/settlement", get(betting::pending_settlements))
        .route("/bets/settle", post(betting::settle_bets))
        .route("/bets/{id}", get(betting::get_bet))
        .route("/bets/{id}/cancel", post(betting::cancel_bet))
        .route("/bets/{id}/refund", post(betting::refund_bet))
        .route(
            "/settings/app",
            get(settings::get_app_settings).put(settings::put_app_settings),
        )
        .route(
            "/settings/payout",
            get(settings::get_payout_settings).put(settings::put_payout_settings),
        )
        .layer(axum::middleware::from_fn(middleware::role_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the document store answers, `503 Service
/// Unavailable` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store.list(containers::APP_SETTINGS).await.is_ok();

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": {
            "backend": state.backend,
            "healthy": store_healthy,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
