//! End-to-end smoke tests for the full wakeshiftd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real outcome worker, real axum router) and exercises the
//! HTTP layer via `tower::ServiceExt::oneshot`: no TCP port is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wakeshift_adapter_http_axum::router;
use wakeshift_adapter_http_axum::state::AppState;
use wakeshift_adapter_storage_sqlite_sqlx::Config;
use wakeshift_app::adjustment_engine::AdjustmentEngine;
use wakeshift_app::effectiveness_tracker::{EffectivenessTracker, OutcomeQueue};
use wakeshift_app::services::rule_service::RuleService;
use wakeshift_domain::aggregation::AdjustmentCeiling;
use wakeshift_domain::effectiveness::{LearningFactor, ReviewPolicy};

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let rules = db.rule_repository();
    let outcomes = db.outcome_store();

    let tracker = EffectivenessTracker::new(
        rules.clone(),
        outcomes.clone(),
        LearningFactor::new(0.3).unwrap(),
        ReviewPolicy::default(),
    );
    let (queue, _worker) = OutcomeQueue::spawn(tracker, 16);

    let state = AppState::new(
        RuleService::new(rules.clone()),
        AdjustmentEngine::new(rules, AdjustmentCeiling::new(120)),
        queue,
        outcomes,
        ReviewPolicy::default(),
    );

    router::build(state)
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn rule_body(id: &str, priority: u8, field: &str, value: &str, minutes: i32, cap: u32) -> Value {
    json!({
        "id": id,
        "priority": priority,
        "condition": {"operator": "contains", "field": field, "value": value},
        "adjustment": {"time_minutes": minutes, "max_adjustment": cap, "reason": format!("{id} rule")}
    })
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_start_with_no_rules() {
    let app = app().await;

    let (status, body) = call(&app, "GET", "/api/rules", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_manage_rule_lifecycle() {
    let app = app().await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        "PUT",
        "/api/rules/rain/enabled",
        Some(json!({"enabled": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);

    let (status, _) = call(&app, "DELETE", "/api/rules/rain", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/api/rules/rain", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_keep_score_and_disabled_flag_across_edit() {
    let app = app().await;
    call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;
    call(
        &app,
        "PUT",
        "/api/rules/rain/enabled",
        Some(json!({"enabled": false})),
    )
    .await;
    let (status, _) = call(
        &app,
        "POST",
        "/api/outcomes",
        Some(json!({"fired_rule_ids": ["rain"], "signal": {"kind": "dismissed"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut edited = rule_body("rain", 4, "weather_condition", "storm", -15, 20);
    edited.as_object_mut().unwrap().remove("id");
    let (status, body) = call(&app, "PUT", "/api/rules/rain", Some(edited)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);
    assert_eq!(body["adjustment"]["time_minutes"], -15);
    assert_eq!(body["effectiveness"]["samples"], 1);
    assert_eq!(body["effectiveness"]["version"], 1);
}

#[tokio::test]
async fn should_install_templates() {
    let app = app().await;

    let (status, body) = call(&app, "POST", "/api/templates/sleep_debt", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "sleep_debt");

    let (_, rules) = call(&app, "GET", "/api/rules", None).await;
    assert_eq!(rules.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_combine_rules_into_wake_plan() {
    let app = app().await;
    call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;
    call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("meeting", 5, "calendar_events", "important", -30, 30)),
    )
    .await;

    let (status, plan) = call(
        &app,
        "POST",
        "/api/adjustments",
        Some(json!({
            "base_wake_time": "2026-03-02T07:00:00Z",
            "context": {
                "weather_condition": "Heavy Rain",
                "calendar_events": [{"title": "IMPORTANT: quarterly review"}]
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["result"]["total_minutes"], -40);
    assert_eq!(plan["adjusted_wake_time"], "2026-03-02T06:20:00Z");
    assert_eq!(plan["result"]["fired_rules"][0]["rule_id"], "meeting");
    assert_eq!(plan["result"]["fired_rules"][1]["rule_id"], "rain");
}

#[tokio::test]
async fn should_cap_total_at_application_ceiling() {
    let app = app().await;
    for id in ["r1", "r2", "r3", "r4", "r5"] {
        call(
            &app,
            "POST",
            "/api/rules",
            Some(rule_body(id, 3, "weather_condition", "snow", -30, 30)),
        )
        .await;
    }

    let (_, plan) = call(
        &app,
        "POST",
        "/api/adjustments",
        Some(json!({
            "base_wake_time": "2026-01-10T07:00:00Z",
            "context": {"weather_condition": "snow"}
        })),
    )
    .await;

    assert_eq!(plan["result"]["total_minutes"], -120);
    assert_eq!(plan["result"]["capped_at"], "application_ceiling");
    assert_eq!(plan["result"]["fired_rules"][4]["rule_id"], "r5");
    assert_eq!(plan["result"]["fired_rules"][4]["contributed_minutes"], 0);
}

// ---------------------------------------------------------------------------
// Outcomes & effectiveness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_learn_from_outcomes_and_flag_weak_rules() {
    let app = app().await;
    call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;

    for _ in 0..5 {
        let (status, _) = call(
            &app,
            "POST",
            "/api/outcomes",
            Some(json!({"fired_rule_ids": ["rain"], "signal": {"kind": "ignored"}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, rule) = call(&app, "GET", "/api/rules/rain", None).await;
    assert_eq!(rule["effectiveness"]["samples"], 5);
    assert_eq!(rule["enabled"], true);

    let (_, review) = call(&app, "GET", "/api/rules/review", None).await;
    assert_eq!(review[0]["id"], "rain");

    let (_, history) = call(&app, "GET", "/api/outcomes?limit=3", None).await;
    assert_eq!(history.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn should_skip_deleted_rules_when_recording_outcome() {
    let app = app().await;
    call(
        &app,
        "POST",
        "/api/rules",
        Some(rule_body("rain", 3, "weather_condition", "rain", -10, 20)),
    )
    .await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/outcomes",
        Some(json!({
            "fired_rule_ids": ["rain", "gone"],
            "signal": {"kind": "satisfaction", "value": 0.9}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["updates"].as_array().unwrap().len(), 1);
    assert_eq!(body["outcome"]["fired_rule_ids"], json!(["rain", "gone"]));
}
