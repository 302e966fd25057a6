//! Integration tests for the wage ledger HTTP API.
//!
//! This test suite drives the router end to end:
//! - Monthly records with rate history, fallback and aggregates
//! - Annual grouping
//! - Evaluation cycle progress and auto-reset
//! - Record management
//! - Error cases

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use wage_ledger::api::{AppState, create_router};
use wage_ledger::config::ConfigLoader;
use wage_ledger::ledger::Ledger;
use wage_ledger::models::SettingsDefaults;
use wage_ledger::store::MemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
}

/// A router over an empty in-memory store whose clock is pinned to `now`.
fn router_at(now: NaiveDateTime) -> Router {
    let store = MemoryStore::new(SettingsDefaults::default());
    let ledger = Ledger::new(Arc::new(store));
    create_router(AppState::with_clock(ledger, move || now))
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None).await
}

async fn post_session(router: &Router, date: &str, start: &str, end: &str, break_minutes: u32) -> Value {
    let (status, body) = send(
        router,
        "POST",
        "/sessions",
        Some(json!({
            "date": date,
            "start_time": start,
            "end_time": end,
            "break_minutes": break_minutes
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "session rejected: {}", body);
    body
}

async fn post_rate(router: &Router, rate: &str, effective_from: &str) -> Value {
    let (status, body) = send(
        router,
        "POST",
        "/rates",
        Some(json!({ "rate": rate, "effective_from": effective_from })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "rate rejected: {}", body);
    body
}

async fn put_aggregate(router: &Router, year: i32, month: u32, total_minutes: u32) -> Value {
    let (status, body) = send(
        router,
        "PUT",
        "/aggregates",
        Some(json!({ "year": year, "month": month, "total_minutes": total_minutes })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "aggregate rejected: {}", body);
    body
}

// =============================================================================
// Monthly records
// =============================================================================

/// AG-101: per-session flooring is visible through the monthly endpoint
#[tokio::test]
async fn test_monthly_floors_each_session() {
    let router = router_at(at("2026-03-31", "20:00"));
    for day in ["2026-03-02", "2026-03-03", "2026-03-04"] {
        post_session(&router, day, "09:00", "09:20", 0).await;
    }

    let (status, body) = get(&router, "/records/2026/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2026);
    assert_eq!(body["month"], 3);
    assert_eq!(body["totals"]["minutes"], 60);
    assert_eq!(decimal(&body["totals"]["wage"]), Decimal::from(999));
    assert_eq!(body["days_worked"], 3);
    assert_eq!(body["average_minutes_per_day"], 20);
    assert_eq!(body["lines"].as_array().unwrap().len(), 3);
}

/// AG-102: sessions and the month's aggregate combine, each at its own rate
#[tokio::test]
async fn test_monthly_combines_sessions_and_aggregate() {
    let router = router_at(at("2026-03-20", "09:00"));
    post_rate(&router, "1200", "2026-03-15").await;
    post_session(&router, "2026-03-14", "09:00", "10:00", 0).await;
    post_session(&router, "2026-03-15", "09:00", "10:00", 0).await;
    put_aggregate(&router, 2026, 3, 60).await;

    let (status, body) = get(&router, "/records/2026/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["minutes"], 180);
    // 1000 fallback + 1200 + aggregate at the March 1st rate (fallback)
    assert_eq!(decimal(&body["totals"]["wage"]), Decimal::from(3200));
    assert_eq!(body["session_totals"]["minutes"], 120);
    assert_eq!(body["aggregate"]["source"]["kind"], "aggregate");
    assert_eq!(decimal(&body["aggregate"]["rate"]), Decimal::from(1000));
}

#[tokio::test]
async fn test_monthly_empty_month() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = get(&router, "/records/2025/11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["minutes"], 0);
    assert_eq!(body["days_worked"], 0);
    assert_eq!(body["average_minutes_per_day"], Value::Null);
    assert_eq!(body["aggregate"], Value::Null);
}

#[tokio::test]
async fn test_monthly_rejects_month_13() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = get(&router, "/records/2026/13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_MONTH");
}

// =============================================================================
// Annual report
// =============================================================================

/// AG-103: sessions group by date year, aggregates by their stored year
#[tokio::test]
async fn test_annual_groups_by_year_newest_first() {
    let router = router_at(at("2026-02-01", "09:00"));
    post_session(&router, "2025-12-31", "09:00", "10:00", 0).await;
    post_session(&router, "2026-01-01", "09:00", "11:00", 0).await;
    put_aggregate(&router, 2024, 6, 600).await;

    let (status, body) = get(&router, "/annual").await;
    assert_eq!(status, StatusCode::OK);

    let years = body["years"].as_array().unwrap();
    let listed: Vec<i64> = years.iter().map(|y| y["year"].as_i64().unwrap()).collect();
    assert_eq!(listed, vec![2026, 2025, 2024]);
    assert_eq!(decimal(&years[0]["totals"]["wage"]), Decimal::from(2000));
    assert_eq!(decimal(&years[1]["totals"]["wage"]), Decimal::from(1000));
    assert_eq!(decimal(&years[2]["totals"]["wage"]), Decimal::from(10000));
    assert_eq!(body["total"]["minutes"], 780);
    assert_eq!(decimal(&body["total"]["wage"]), Decimal::from(13000));
}

// =============================================================================
// Evaluation cycle
// =============================================================================

/// CY-101: the dashboard restarts a completed cycle, GET /cycle does not
#[tokio::test]
async fn test_dashboard_auto_resets_completed_cycle() {
    let now = at("2026-03-10", "12:00");
    let router = router_at(now);

    let (status, _) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "evaluation_cycle_hours": 8, "cycle_start": "2026-03-01T00:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    post_session(&router, "2026-03-02", "09:00", "18:00", 0).await;

    let (_, cycle) = get(&router, "/cycle").await;
    assert_eq!(cycle["totals"]["minutes"], 540);
    assert_eq!(cycle["reached"], true);
    assert_eq!(cycle["reset_performed"], false);
    assert_eq!(decimal(&cycle["progress_percent"]), Decimal::from(100));

    let (status, dashboard) = get(&router, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["cycle"]["reset_performed"], true);
    assert_eq!(dashboard["cycle"]["started_at"], "2026-03-10T12:00:00");
    assert_eq!(dashboard["cycle"]["totals"]["minutes"], 0);
    assert_eq!(decimal(&dashboard["cycle"]["remaining_hours"]), Decimal::from(8));
    assert_eq!(dashboard["month"]["totals"]["minutes"], 540);
    assert_eq!(dashboard["today"], "2026-03-10");

    let (_, again) = get(&router, "/dashboard").await;
    assert_eq!(again["cycle"]["reset_performed"], false);
    assert_eq!(again["cycle"]["started_at"], "2026-03-10T12:00:00");
}

#[tokio::test]
async fn test_manual_cycle_reset() {
    let now = at("2026-04-02", "08:15");
    let router = router_at(now);

    let (status, body) = send(&router, "POST", "/cycle/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle_start"], "2026-04-02T08:15:00");
}

#[tokio::test]
async fn test_dashboard_lists_five_recent_sessions_newest_first() {
    let router = router_at(at("2026-05-31", "20:00"));
    for day in 1..=7 {
        post_session(&router, &format!("2026-05-{:02}", day), "09:00", "10:00", 0).await;
    }

    let (status, body) = get(&router, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let recent = body["recent_sessions"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["session"]["date"], "2026-05-07");
    assert_eq!(recent[4]["session"]["date"], "2026-05-03");
    assert_eq!(decimal(&recent[0]["contribution"]["wage"]), Decimal::from(1000));
}

// =============================================================================
// Record management
// =============================================================================

#[tokio::test]
async fn test_session_update_and_delete() {
    let router = router_at(at("2026-03-20", "09:00"));
    let created = post_session(&router, "2026-03-02", "09:00", "17:00", 60).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &router,
        "PUT",
        &format!("/sessions/{}", id),
        Some(json!({
            "date": "2026-03-02",
            "start_time": "09:00",
            "end_time": "12:00",
            "note": "half day"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["note"], "half day");

    let (_, month) = get(&router, "/records/2026/3").await;
    assert_eq!(month["totals"]["minutes"], 180);

    let (status, _) = send(&router, "DELETE", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, "DELETE", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_aggregate_upsert_replaces_same_month() {
    let router = router_at(at("2026-03-20", "09:00"));
    let first = put_aggregate(&router, 2024, 2, 600).await;
    let second = put_aggregate(&router, 2024, 2, 900).await;
    assert_eq!(first["id"], second["id"]);

    let (_, month) = get(&router, "/records/2024/2").await;
    assert_eq!(month["totals"]["minutes"], 900);

    let id = second["id"].as_str().unwrap();
    let (status, _) = send(&router, "DELETE", &format!("/aggregates/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, month) = get(&router, "/records/2024/2").await;
    assert_eq!(month["totals"]["minutes"], 0);
}

/// RR-101: same-day rate entries resolve to the last one added
#[tokio::test]
async fn test_same_day_rates_last_added_wins() {
    let router = router_at(at("2026-03-20", "09:00"));
    post_rate(&router, "1100", "2026-01-01").await;
    post_rate(&router, "1300", "2026-01-01").await;
    post_session(&router, "2026-02-02", "09:00", "10:00", 0).await;

    let (_, month) = get(&router, "/records/2026/2").await;
    assert_eq!(decimal(&month["totals"]["wage"]), Decimal::from(1300));

    let (status, rates) = get(&router, "/rates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rates.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_settings_fallback_rate_applies_without_history() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, settings) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "hourly_rate": "1500" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["evaluation_cycle_hours"], 160);

    post_session(&router, "2026-03-02", "09:00", "11:00", 0).await;
    let (_, month) = get(&router, "/records/2026/3").await;
    assert_eq!(decimal(&month["totals"]["wage"]), Decimal::from(3000));
}

fn router_from_config(dir: &str, now: NaiveDateTime) -> Router {
    let config = ConfigLoader::load(dir).expect("Failed to load config");
    let store = MemoryStore::seeded(config.config());
    create_router(AppState::with_clock(Ledger::new(Arc::new(store)), move || now))
}

#[tokio::test]
async fn test_seeded_rates_from_sample_config() {
    let router = router_from_config("./config/sample", at("2026-01-10", "09:00"));

    let (_, rates) = get(&router, "/rates").await;
    assert_eq!(rates.as_array().unwrap().len(), 2);

    post_session(&router, "2025-05-01", "09:00", "10:00", 0).await;
    let (_, month) = get(&router, "/records/2025/5").await;
    assert_eq!(decimal(&month["totals"]["wage"]), Decimal::from(1100));
}

/// RR-102: a fresh default ledger pays at the settings rate
#[tokio::test]
async fn test_default_config_starts_with_empty_rate_history() {
    let router = router_from_config("./config/default", at("2026-03-10", "09:00"));

    let (_, rates) = get(&router, "/rates").await;
    assert!(rates.as_array().unwrap().is_empty());

    post_session(&router, "2026-03-02", "09:00", "10:00", 0).await;
    let (_, month) = get(&router, "/records/2026/3").await;
    assert_eq!(decimal(&month["lines"][0]["rate"]), Decimal::from(1000));
    assert_eq!(decimal(&month["totals"]["wage"]), Decimal::from(1000));
}

/// AG-104: an out-of-range rate is rejected before it can reach any view
#[tokio::test]
async fn test_oversized_rate_rejected_and_views_still_served() {
    let router = router_at(at("2026-03-10", "09:00"));
    let (status, body) = send(
        &router,
        "POST",
        "/rates",
        Some(json!({ "rate": "79228162514264337593543950335", "effective_from": "2026-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "hourly_rate": "10000000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post_session(&router, "2026-03-02", "09:00", "17:00", 0).await;
    let (status, _) = get(&router, "/annual").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_invalid_time_rejected() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = send(
        &router,
        "POST",
        "/sessions",
        Some(json!({ "date": "2026-03-02", "start_time": "25:00", "end_time": "26:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TIME");
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = send(
        &router,
        "POST",
        "/sessions",
        Some(json!({ "date": "2026-03-02", "start_time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let router = router_at(at("2026-03-20", "09:00"));
    let request = Request::builder()
        .method("POST")
        .uri("/rates")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_negative_rate_rejected() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = send(
        &router,
        "POST",
        "/rates",
        Some(json!({ "rate": "-5", "effective_from": "2026-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_zero_cycle_hours_rejected() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, _) = send(
        &router,
        "PUT",
        "/settings",
        Some(json!({ "evaluation_cycle_hours": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_rate_update_is_not_found() {
    let router = router_at(at("2026-03-20", "09:00"));
    let (status, body) = send(
        &router,
        "PUT",
        &format!("/rates/{}", uuid::Uuid::new_v4()),
        Some(json!({ "rate": "1000", "effective_from": "2026-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RATE_NOT_FOUND");
}

#[test]
fn test_clock_helper() {
    assert_eq!(
        at("2026-03-20", "09:00").date(),
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    );
}
