//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use district_sim::api::{AppState, router};
use district_sim::devices::DeviceRegistry;
use district_sim::runtime;
use district_sim::sim::engine::Engine;
use district_sim::sim::types::SimConfig;

/// Spin up a fast-ticking scheduler and return the API state.
async fn build_api_state() -> Arc<AppState> {
    let engine = Engine::new(SimConfig::new(10, 12, 42), DeviceRegistry::default_home());
    let (handle, _scheduler) = runtime::spawn(engine, Duration::from_millis(5), None);
    tokio::time::sleep(Duration::from_millis(60)).await;
    Arc::new(AppState { handle })
}

async fn get_json(state: Arc<AppState>, uri: &str) -> serde_json::Value {
    let app = router(state);
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn all_read_endpoints_return_snapshots() {
    let state = build_api_state().await;

    let reading = get_json(state.clone(), "/reading").await;
    assert!(reading["power_w"].as_f64().unwrap_or(-1.0) >= 0.0);

    let floors = get_json(state.clone(), "/building/floors").await;
    assert_eq!(floors.as_array().map(Vec::len), Some(8));

    let machines = get_json(state.clone(), "/industry/machines").await;
    assert_eq!(machines.as_array().map(Vec::len), Some(6));

    let wards = get_json(state.clone(), "/city/wards").await;
    assert_eq!(wards.as_array().map(Vec::len), Some(24));

    let market = get_json(state.clone(), "/market").await;
    assert!(market["price"].as_f64().unwrap_or(0.0) >= 5.0);
    assert!(market.get("wallet_balance").is_some());

    let scope = get_json(state, "/industry/scope").await;
    assert!(scope.as_array().map(Vec::len).unwrap_or(0) <= 30);
}

#[tokio::test]
async fn affordable_buy_settles_into_the_ledger() {
    let state = build_api_state().await;
    let app = router(state.clone());

    // 1 credit at ~13.42 against the 24.50 wallet is affordable
    let req = Request::builder()
        .method("POST")
        .uri("/market/trade")
        .header("content-type", "application/json")
        .body(Body::from(r#"{ "amount": 1.0, "side": "buy" }"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let market = state.handle.latest().market.clone();
    assert!(market.wallet_balance < 24.50);
    assert!(market.portfolio_value > 1200.0);
}

#[tokio::test]
async fn underfunded_buy_is_queued_but_leaves_the_ledger_unchanged() {
    let state = build_api_state().await;
    let app = router(state.clone());

    let req = Request::builder()
        .method("POST")
        .uri("/market/trade")
        .header("content-type", "application/json")
        .body(Body::from(r#"{ "amount": 10.0, "side": "buy" }"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let market = state.handle.latest().market.clone();
    assert_eq!(market.wallet_balance, 24.50);
    assert_eq!(market.portfolio_value, 1200.0);
}

#[tokio::test]
async fn unknown_device_toggle_is_a_noop() {
    let state = build_api_state().await;
    let app = router(state.clone());
    let roster_before: Vec<(String, bool)> = state
        .handle
        .latest()
        .devices
        .iter()
        .map(|d| (d.id.clone(), d.is_on))
        .collect();

    let req = Request::builder()
        .method("POST")
        .uri("/devices/99/toggle")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let roster_after: Vec<(String, bool)> = state
        .handle
        .latest()
        .devices
        .iter()
        .map(|d| (d.id.clone(), d.is_on))
        .collect();
    assert_eq!(roster_after, roster_before);
}

#[tokio::test]
async fn toggle_changes_the_next_published_power() {
    let state = build_api_state().await;
    let app = router(state.clone());

    let req = Request::builder()
        .method("POST")
        .uri("/devices/2/toggle")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let snap = state.handle.latest();
    let ev_on = snap
        .devices
        .iter()
        .find(|d| d.id == "2")
        .map(|d| d.is_on)
        .unwrap_or(false);
    assert!(ev_on);
    // 7.2 kW of charger dwarfs the rest of the roster
    assert!(snap.reading.power_w > 7000.0);
}
