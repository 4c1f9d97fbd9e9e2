//! End-to-end smoke tests for the full opsdeckd stack.
//!
//! Each test wires the seeded store, the real service and the real axum
//! router together and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`, so no TCP port is bound.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use opsdeck_adapter_http_axum::router;
use opsdeck_adapter_http_axum::state::AppState;
use opsdeck_adapter_seed::demo_automations;
use opsdeck_app::id_generator::SequentialIdGenerator;
use opsdeck_app::services::automation_service::AutomationService;
use opsdeck_app::services::automation_store::AutomationStore;
use opsdeck_domain::time;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Build a fully-wired router over the demo automations.
fn app() -> axum::Router {
    let seed = demo_automations(time::now()).expect("demo data should be valid");
    let ids = SequentialIdGenerator::resuming(&seed);
    let store = AutomationStore::with_automations(seed, ids).expect("demo ids should be unique");
    router::build(AppState::new(AutomationService::new(store)))
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
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
// Seeded reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_list_seeded_automations() {
    let (status, list) = send(&app(), Method::GET, "/api/automations", None).await;

    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 6);
    assert_eq!(list[0]["id"], "auto-001");
    assert_eq!(list[0]["type"], "rpa-bot");
}

#[tokio::test]
async fn should_summarize_seeded_dashboard() {
    let (status, summary) = send(&app(), Method::GET, "/api/dashboard?limit=3", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total"], 6);
    assert_eq!(summary["active"], 3);
    assert_eq!(summary["errors"], 1);
    assert_eq!(summary["drafts"], 1);
    assert_eq!(summary["inactive"], 1);
    assert_eq!(summary["recent"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn should_search_seeded_automations_by_owner() {
    let (_, list) = send(&app(), Method::GET, "/api/automations?search=maria", None).await;

    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"auto-001"));
}

// ---------------------------------------------------------------------------
// Mutations continue numbering after the seed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_continue_id_sequence_after_seed() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/automations",
        Some(json!({
            "name": "Quarterly Audit",
            "type": "scheduled-script",
            "environment": "staging",
            "owner": "Lee",
            "description": "Collects audit evidence",
            "tags": ["audit"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "auto-007");

    let (status, section) = send(
        &app,
        Method::POST,
        "/api/automations/auto-007/sections",
        Some(json!({"name": "Storage", "entries": [{"key": "bucket", "type": "string", "value": "audits"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(section["id"], "cs-008");
    assert_eq!(section["entries"][0]["id"], "ce-019");
}

#[tokio::test]
async fn should_duplicate_seeded_automation_with_fresh_ids() {
    let app = app();
    let (_, original) = send(&app, Method::GET, "/api/automations/auto-001", None).await;

    let (status, copy) = send(&app, Method::POST, "/api/automations/auto-001/duplicate", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["id"], "auto-007");
    assert_eq!(copy["name"], "Invoice Processing Bot_copy");
    assert_eq!(copy["status"], original["status"]);
    assert_eq!(copy["version"], "0.1.0");
    let original_sections = original["config"].as_array().unwrap();
    let copied_sections = copy["config"].as_array().unwrap();
    assert_eq!(original_sections.len(), copied_sections.len());
    for (a, b) in original_sections.iter().zip(copied_sections) {
        assert_ne!(a["id"], b["id"]);
        assert_eq!(a["name"], b["name"]);
    }
}

#[tokio::test]
async fn should_disable_all_seeded_automations() {
    let app = app();

    let (status, result) = send(&app, Method::POST, "/api/automations/disable-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["disabled"], 6);

    let (_, rows) = send(&app, Method::GET, "/api/schedules", None).await;
    assert!(rows.as_array().unwrap().iter().all(|row| row["enabled"] == false));
}

#[tokio::test]
async fn should_delete_seeded_automation() {
    let app = app();

    let (status, _) = send(&app, Method::DELETE, "/api/automations/auto-003", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/automations/auto-003", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/api/automations", None).await;
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn should_return_404_for_unknown_route() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
