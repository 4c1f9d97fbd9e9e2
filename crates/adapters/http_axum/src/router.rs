//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use opsdeck_app::ports::IdGenerator;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<G>(state: AppState<G>) -> Router
where
    G: IdGenerator + Send + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use opsdeck_app::id_generator::SequentialIdGenerator;
    use opsdeck_app::services::automation_service::AutomationService;
    use opsdeck_app::services::automation_store::AutomationStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = AutomationStore::new(SequentialIdGenerator::default());
        build(AppState::new(AutomationService::new(store)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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

    fn nightly_sync() -> Value {
        json!({
            "name": "Nightly Sync",
            "type": "data-pipeline",
            "environment": "production",
            "owner": "Ana",
            "description": "",
            "tags": []
        })
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_then_duplicate_automation() {
        let app = app();

        let (status, created) =
            send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], "auto-001");
        assert_eq!(created["status"], "draft");
        assert_eq!(created["version"], "0.1.0");
        assert_eq!(created["config"], json!([]));

        let (status, copy) =
            send(&app, Method::POST, "/api/automations/auto-001/duplicate", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(copy["name"], "Nightly Sync_copy");
        assert_ne!(copy["id"], created["id"]);
    }

    #[tokio::test]
    async fn should_return_400_when_create_has_blank_name() {
        let app = app();
        let mut body = nightly_sync();
        body["name"] = json!("  ");

        let (status, error) = send(&app, Method::POST, "/api/automations", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn should_return_404_when_automation_missing() {
        let (status, error) = send(&app(), Method::GET, "/api/automations/auto-999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"], "Automation `auto-999` not found");
    }

    #[tokio::test]
    async fn should_reject_patch_of_protected_field() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;

        let (status, error) = send(
            &app,
            Method::PATCH,
            "/api/automations/auto-001",
            Some(json!({"createdAt": "2020-01-01T00:00:00Z"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("createdAt"));
    }

    #[tokio::test]
    async fn should_patch_and_clear_schedule() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;

        let (status, updated) = send(
            &app,
            Method::PATCH,
            "/api/automations/auto-001",
            Some(json!({"owner": "Ben", "cronExpression": "0 2 * * *"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["owner"], "Ben");
        assert_eq!(updated["cronExpression"], "0 2 * * *");

        let (_, cleared) = send(
            &app,
            Method::PUT,
            "/api/automations/auto-001/schedule",
            Some(json!({"cronExpression": null})),
        )
        .await;
        assert!(cleared.get("cronExpression").is_none());
    }

    #[tokio::test]
    async fn should_run_nested_mutation_scenario() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;

        let (status, section) = send(
            &app,
            Method::POST,
            "/api/automations/auto-001/sections",
            Some(json!({"name": "DB", "entries": []})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(section["id"], "cs-001");

        let (status, entry) = send(
            &app,
            Method::POST,
            "/api/automations/auto-001/sections/cs-001/entries",
            Some(json!({"key": "host", "type": "string", "value": "db.local", "required": true})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["id"], "ce-001");

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/api/automations/auto-001/sections/cs-001/entries/ce-001/value",
            Some(json!({"type": "string", "value": "db.remote"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["value"], "db.remote");
        assert_eq!(updated["type"], "string");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/automations/auto-001/sections/cs-001/entries/ce-001/value",
            Some(json!({"type": "number", "value": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_create_entry_from_format_default() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        send(
            &app,
            Method::POST,
            "/api/automations/auto-001/sections",
            Some(json!({"name": "Limits"})),
        )
        .await;

        let (status, entry) = send(
            &app,
            Method::POST,
            "/api/automations/auto-001/sections/cs-001/entries",
            Some(json!({"key": "payload", "format": "jsonb"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["type"], "string");
        assert_eq!(entry["value"], "{}");
    }

    #[tokio::test]
    async fn should_cascade_delete_section() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        send(
            &app,
            Method::POST,
            "/api/automations/auto-001/sections",
            Some(json!({"name": "DB", "entries": [{"key": "host", "type": "string"}]})),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/automations/auto-001/sections/cs-001",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/automations/auto-001/sections/cs-001/entries/ce-001",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_404_when_removing_entry_from_empty_store() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/automations/auto-999/sections/cs-999/entries/ce-999",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, Method::GET, "/api/automations", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn should_disable_all_and_report_in_schedules() {
        let app = app();
        for _ in 0..2 {
            send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        }
        send(
            &app,
            Method::PUT,
            "/api/automations/auto-001/enabled",
            Some(json!({"enabled": true})),
        )
        .await;

        let (_, rows) = send(&app, Method::GET, "/api/schedules", None).await;
        assert_eq!(rows[0]["enabled"], true);

        let (status, result) = send(&app, Method::POST, "/api/automations/disable-all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["disabled"], 2);

        let (_, list) = send(&app, Method::GET, "/api/automations?status=inactive", None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_summarize_dashboard() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        send(
            &app,
            Method::PUT,
            "/api/automations/auto-001/status",
            Some(json!({"status": "error"})),
        )
        .await;

        let (status, summary) = send(&app, Method::GET, "/api/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total"], 1);
        assert_eq!(summary["errors"], 1);
        assert_eq!(summary["byKind"][0]["type"], "data-pipeline");
        assert_eq!(summary["byKind"][0]["label"], "Data Pipeline");
    }

    #[tokio::test]
    async fn should_filter_list_by_search_and_type() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;
        let mut bot = nightly_sync();
        bot["name"] = json!("Invoice Bot");
        bot["type"] = json!("rpa-bot");
        send(&app, Method::POST, "/api/automations", Some(bot)).await;

        let (_, list) = send(&app, Method::GET, "/api/automations?search=invoice", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (_, list) = send(&app, Method::GET, "/api/automations?type=data-pipeline", None).await;
        assert_eq!(list[0]["name"], "Nightly Sync");
    }

    #[tokio::test]
    async fn should_delete_automation() {
        let app = app();
        send(&app, Method::POST, "/api/automations", Some(nightly_sync())).await;

        let (status, _) = send(&app, Method::DELETE, "/api/automations/auto-001", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::DELETE, "/api/automations/auto-001", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
