//! Integration tests for the HTTP API.
//!
//! Every test drives the router in-process over a fresh in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use ringside::fight_card::{Bout, FightCard};
use ringside::roster::Boxer;
use ringside::store::{self, DocumentStore, InMemoryStore};
use ringside_server::api::{AppState, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

/// Helper to create a test server over a seeded store
async fn create_test_server(boxers: usize) -> (axum::Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());

    for i in 0..boxers {
        let boxer = Boxer::new(format!("b{i}"), format!("NV-{i}"), format!("Boxer {i}"))
            .with_ranking_points(1_000 - i as i64);
        store::insert(store.as_ref(), &boxer).await.unwrap();
    }

    let mut main = Bout::new("main", "b0", "b1");
    main.fighter1_name = Some("Boxer 0".to_string());
    main.fighter2_name = Some("Boxer 1".to_string());
    let card = FightCard::new("card-1", "Desert Classic", main);
    store::insert(store.as_ref(), &card).await.unwrap();

    let shared: Arc<dyn DocumentStore> = store.clone();
    let app = create_router(AppState::new(shared, "memory"));
    (app, store)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    role: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-ringside-role", role);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn bet_slip(bettor: &str, fighter: &str, amount: i64) -> Value {
    json!({
        "bettorId": bettor,
        "bettorName": bettor,
        "bettorStateId": format!("DL-{bettor}"),
        "fightCardId": "card-1",
        "boutId": "main",
        "fighterId": fighter,
        "amount": amount,
    })
}

// ============================================================================
// Health and Middleware Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server(0).await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_unknown_role_is_forbidden() {
    let (app, _) = create_test_server(0).await;

    let (status, body) = send(&app, "GET", "/api/v1/boxers/top32", Some("promoter"), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_role_is_viewer() {
    let (app, _) = create_test_server(16).await;

    let (status, body) = send(&app, "GET", "/api/v1/boxers/top32", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 16);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        None,
        Some(json!({"name": "Golden Gloves"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = create_test_server(0).await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_404_for_invalid_endpoint() {
    let (app, _) = create_test_server(0).await;

    let (status, _) = send(&app, "GET", "/api/v1/nonexistent", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Tournament Tests
// ============================================================================

#[tokio::test]
async fn test_tournament_create_and_advance() {
    let (app, _) = create_test_server(32).await;

    let (status, tournament) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        Some("commissioner"),
        Some(json!({"name": "Golden Gloves", "seedingMethod": "ranked"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tournament["matches"].as_array().unwrap().len(), 31);
    assert_eq!(tournament["status"], "draft");

    let id = tournament["id"].as_str().unwrap();
    let first = &tournament["matches"][0];
    let winner = first["fighter1"]["boxerId"].as_str().unwrap();

    let (status, advanced) = send(
        &app,
        "POST",
        &format!("/api/v1/tournaments/{id}/advance"),
        Some("commissioner"),
        Some(json!({"matchId": "match-1", "winnerId": winner})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advanced["status"], "active");
    assert_eq!(advanced["matches"][0]["winnerId"], winner);
    assert_eq!(advanced["matches"][16]["fighter1"]["boxerId"], winner);

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/tournaments/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, advanced);

    let (status, list) = send(&app, "GET", "/api/v1/tournaments", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_advance_before_opponent_arrives_is_conflict() {
    let (app, _) = create_test_server(32).await;

    let (_, tournament) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        Some("commissioner"),
        Some(json!({"name": "Golden Gloves"})),
    )
    .await;
    let id = tournament["id"].as_str().unwrap();
    let winner = tournament["matches"][0]["fighter1"]["boxerId"].as_str().unwrap();

    send(
        &app,
        "POST",
        &format!("/api/v1/tournaments/{id}/advance"),
        Some("commissioner"),
        Some(json!({"matchId": "match-1", "winnerId": winner})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/tournaments/{id}/advance"),
        Some("commissioner"),
        Some(json!({"matchId": "match-17", "winnerId": winner})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tournament_rejects_small_roster_and_blank_name() {
    let (app, _) = create_test_server(10).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        Some("commissioner"),
        Some(json!({"name": "Tiny Cup"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        Some("commissioner"),
        Some(json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_tournament_not_found() {
    let (app, _) = create_test_server(0).await;

    let (status, body) = send(&app, "GET", "/api/v1/tournaments/missing", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

// ============================================================================
// Results and Betting Tests
// ============================================================================

#[tokio::test]
async fn test_declare_results_updates_records() {
    let (app, store) = create_test_server(2).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/fight-cards/card-1/results",
        Some("cashier"),
        Some(json!({"decisions": [{"boutId": "main", "winner": "fighter1", "knockout": true}]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/fight-cards/card-1/results",
        Some("commissioner"),
        Some(json!({"decisions": [{"boutId": "main", "winner": "fighter1", "knockout": true}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card"]["status"], "completed");
    assert_eq!(body["updatedBoxers"].as_array().unwrap().len(), 2);

    let winner: Boxer = store::fetch(store.as_ref(), "b0").await.unwrap();
    assert_eq!((winner.wins, winner.knockouts), (1, 1));
}

#[tokio::test]
async fn test_repeated_bout_decision_is_rejected() {
    let (app, store) = create_test_server(2).await;

    let decision = json!({"boutId": "main", "winner": "fighter1", "knockout": true});
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/fight-cards/card-1/results",
        Some("commissioner"),
        Some(json!({"decisions": [decision.clone(), decision]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let winner: Boxer = store::fetch(store.as_ref(), "b0").await.unwrap();
    assert_eq!((winner.wins, winner.knockouts), (0, 0));
}

#[tokio::test]
async fn test_betting_flow_over_http() {
    let (app, _) = create_test_server(2).await;

    let (status, pool) = send(&app, "POST", "/api/v1/fight-cards/card-1/pool", Some("cashier"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pool["status"], "open");

    let (status, odds) = send(
        &app,
        "GET",
        "/api/v1/odds?boxerId=b0&fightCardId=card-1&format=decimal",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(odds["pending"], false);
    assert_eq!(odds["odds"], "2.00");

    let (status, bet) = send(&app, "POST", "/api/v1/bets", Some("cashier"), Some(bet_slip("kim", "b0", 1_000))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bet["status"], "pending");
    assert_eq!(bet["potentialPayout"], 2_000);
    let bet_id = bet["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/bets/{bet_id}"), Some("cashier"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], bet_id.as_str());

    send(&app, "POST", "/api/v1/bets", Some("cashier"), Some(bet_slip("lee", "b1", 1_000))).await;

    let (status, _) = send(&app, "POST", "/api/v1/fight-cards/card-1/pool/lock", Some("cashier"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/v1/bets", Some("cashier"), Some(bet_slip("max", "b0", 1_000))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(
        &app,
        "POST",
        "/api/v1/fight-cards/card-1/results",
        Some("commissioner"),
        Some(json!({"decisions": [{"boutId": "main", "winner": "fighter1"}]})),
    )
    .await;

    let (status, pending) = send(&app, "GET", "/api/v1/bets/settlement", Some("cashier"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 2);

    // Only one bettor verified
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bets/settle",
        Some("cashier"),
        Some(json!({"verifications": {"kim": "dl-kim"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("lee"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bets/settle",
        Some("cashier"),
        Some(json!({"verifications": {"kim": " dl-kim ", "lee": "DL-LEE"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let settled = body["settled"].as_array().unwrap();
    assert_eq!(settled.len(), 2);
    let kim = settled.iter().find(|b| b["bettorId"] == "kim").unwrap();
    assert_eq!(kim["status"], "won");
    assert_eq!(kim["actualPayout"], 2_000);

    let (_, pool) = send(&app, "GET", "/api/v1/fight-cards/card-1/pool", None, None).await;
    assert_eq!(pool["status"], "settled");
}

#[tokio::test]
async fn test_settle_with_nothing_pending_is_rejected() {
    let (app, _) = create_test_server(2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bets/settle",
        Some("cashier"),
        Some(json!({"verifications": {}})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "No valid bets to settle");
}

#[tokio::test]
async fn test_odds_pending_and_bad_format() {
    let (app, _) = create_test_server(2).await;

    let (status, odds) = send(&app, "GET", "/api/v1/odds?boxerId=b0&fightCardId=card-1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(odds["pending"], true);
    assert!(odds.get("odds").is_none());

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/odds?boxerId=b0&fightCardId=card-1&format=roman",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_bet_over_http() {
    let (app, _) = create_test_server(2).await;
    send(&app, "POST", "/api/v1/fight-cards/card-1/pool", Some("cashier"), None).await;
    let (_, bet) = send(&app, "POST", "/api/v1/bets", Some("cashier"), Some(bet_slip("kim", "b1", 500))).await;
    let bet_id = bet["id"].as_str().unwrap();

    let (status, cancelled) = send(
        &app,
        "POST",
        &format!("/api/v1/bets/{bet_id}/cancel"),
        Some("cashier"),
        Some(json!({"reason": "entered twice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/bets/{bet_id}/refund"),
        Some("cashier"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[tokio::test]
async fn test_settings_roundtrip() {
    let (app, _) = create_test_server(0).await;

    let (status, defaults) = send(&app, "GET", "/api/v1/settings/payout", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let mut update = defaults.clone();
    update["bonusRate"] = json!(0.1);

    let (status, _) = send(&app, "PUT", "/api/v1/settings/payout", Some("cashier"), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, saved) = send(&app, "PUT", "/api/v1/settings/payout", Some("admin"), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["bonusRate"], 0.1);
    assert!(saved["updatedAt"].is_string());

    let (_, fetched) = send(&app, "GET", "/api/v1/settings/payout", None, None).await;
    assert_eq!(fetched, saved);

    let mut invalid = fetched.clone();
    invalid["taxRate"] = json!(1.5);
    let (status, _) = send(&app, "PUT", "/api/v1/settings/payout", Some("admin"), Some(invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_app_settings_disable_betting() {
    let (app, _) = create_test_server(2).await;
    send(&app, "POST", "/api/v1/fight-cards/card-1/pool", Some("cashier"), None).await;

    let (_, mut settings) = send(&app, "GET", "/api/v1/settings/app", None, None).await;
    settings["bettingEnabled"] = json!(false);
    let (status, _) = send(&app, "PUT", "/api/v1/settings/app", Some("admin"), Some(settings)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/v1/bets", Some("cashier"), Some(bet_slip("kim", "b0", 500))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
