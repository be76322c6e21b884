//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use tariff_sim::api::{AppState, router};
use tariff_sim::config::ScenarioConfig;
use tariff_sim::runner::run_scenario;

/// Runs a scenario over two synthetic days and returns the API state.
fn build_api_state(scenario: &ScenarioConfig) -> Arc<AppState> {
    let series = common::synthetic(2, 42);
    let report = run_scenario(&series, scenario).unwrap();
    Arc::new(AppState { series, report })
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn combined_scenario_report_endpoint() {
    let state = build_api_state(&ScenarioConfig::solar_battery());
    let (status, json) = get(state, "/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tariff"]["id"], "octopus_flux");
    assert_eq!(json["simulation"]["kind"], "combined");
    assert_eq!(json["simulation"]["timeline"].as_array().map(Vec::len), Some(96));
    assert!(json["statistics"]["total"].as_f64().unwrap() > 0.0);
    assert!(json["cost"]["breakdown"].get("flux_peak").is_some());
    assert!(json["battery_recommendation"]["capacity_kwh"].is_number());
}

#[tokio::test]
async fn never_paying_back_serializes_as_null() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.tariff.preset = "flat".to_string();
    let (status, json) = get(build_api_state(&scenario), "/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["simulation"]["kind"], "battery");
    assert!(json["simulation"]["payback_years"].is_null());
}

#[tokio::test]
async fn combined_timeline_range() {
    let state = build_api_state(&ScenarioConfig::solar_battery());
    let (status, json) = get(state, "/timeline?from=20&to=27").await;

    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0]["index"], 20);
    assert_eq!(records[0]["start"], "2024-01-01T10:00:00");
    assert!(records[0]["simulated"].get("solar_to_load").is_some());
    assert_eq!(records[7]["index"], 27);
}

#[tokio::test]
async fn tariff_only_timeline_has_no_simulated_state() {
    let state = build_api_state(&ScenarioConfig::tariff_only());
    let (status, json) = get(state, "/timeline?to=3").await;

    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r["simulated"].is_null()));
}

#[tokio::test]
async fn timeline_past_the_end_is_empty() {
    let state = build_api_state(&ScenarioConfig::baseline());
    let (status, json) = get(state, "/timeline?from=500").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn aggregate_defaults_to_days() {
    let state = build_api_state(&ScenarioConfig::baseline());
    let (status, json) = get(state, "/aggregate").await;

    assert_eq!(status, StatusCode::OK);
    let buckets = json.as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["period"], "2024-01-01");
    assert_eq!(buckets[1]["count"], 48);
}

#[tokio::test]
async fn aggregate_rejects_unknown_frame() {
    let state = build_api_state(&ScenarioConfig::baseline());
    let (status, json) = get(state, "/aggregate?frame=quarter").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("quarter"));
}
