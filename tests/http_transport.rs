//! End-to-end checks of the reqwest transport against a local axum server.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use eera_skills::skills::config::SkillsTimeouts;
use eera_skills::skills::{SkillDispatcher, SkillErrorCode, SkillOutcome, SkillRegistry, SkillsConfig};
use serde_json::{Value, json};

const ACCESS_KEY: &str = "anon-key";

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).unwrap_or_default();
    Json(json!({ "auth": auth, "received": body }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "scheduler exploded")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({ "late": true }))
}

/// Serve the fake edge functions and return the base URL.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/functions/v1/ops-skills/task-extractor", post(echo))
        .route("/functions/v1/ops-skills/scheduler", post(broken))
        .route("/functions/v1/ops-skills/workflow-runner", post(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn dispatcher(timeouts: SkillsTimeouts) -> SkillDispatcher {
    let base = spawn_backend().await;
    let config = SkillsConfig::new(base, ACCESS_KEY).with_timeouts(timeouts);
    SkillDispatcher::with_reqwest(SkillRegistry::builtin(), config).unwrap()
}

#[tokio::test]
async fn ok_call_sends_bearer_and_wire_body() {
    let dispatcher = dispatcher(SkillsTimeouts::default()).await;

    let outcome: SkillOutcome<Value> = dispatcher
        .run("task_extractor", json!({ "text": "Call Bob tomorrow" }), Some("u-1"), Some("trace-9"))
        .await;

    let SkillOutcome::Ok { output, .. } = outcome else {
        panic!("expected ok, got {outcome:?}");
    };
    assert_eq!(output["auth"], "Bearer anon-key");
    assert_eq!(
        output["received"],
        json!({
            "skillId": "task_extractor",
            "input": { "text": "Call Bob tomorrow" },
            "userContext": { "userId": "u-1" },
            "traceId": "trace-9",
        })
    );
}

#[tokio::test]
async fn missing_function_maps_to_http_404() {
    let dispatcher = dispatcher(SkillsTimeouts::default()).await;

    let outcome: SkillOutcome<Value> = dispatcher.run("sentiment", json!({ "text": "great" }), None, None).await;

    assert_eq!(outcome.error_code(), Some(SkillErrorCode::Http(404)));
    let SkillOutcome::Error { message, elapsed_ms, .. } = outcome else { unreachable!() };
    assert_eq!(message, "Not Found");
    assert!(elapsed_ms.is_some());
}

#[tokio::test]
async fn server_error_body_becomes_message() {
    let dispatcher = dispatcher(SkillsTimeouts::default()).await;

    let outcome: SkillOutcome<Value> = dispatcher.run("scheduler", json!({}), None, None).await;

    assert_eq!(outcome.error_code(), Some(SkillErrorCode::Http(500)));
    assert!(outcome.error_code().is_some_and(|c| c.retryable()));
    let SkillOutcome::Error { message, .. } = outcome else { unreachable!() };
    assert_eq!(message, "scheduler exploded");
}

#[tokio::test]
async fn request_timeout_reports_network() {
    let dispatcher = dispatcher(SkillsTimeouts { request_secs: 1, connect_secs: 1 }).await;

    let outcome: SkillOutcome<Value> = dispatcher.run("workflow_runner", json!({}), None, None).await;

    assert_eq!(outcome.error_code(), Some(SkillErrorCode::Network));
}

#[tokio::test]
async fn unreachable_backend_reports_network() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = SkillsConfig::new(format!("http://{addr}"), ACCESS_KEY);
    let dispatcher = SkillDispatcher::with_reqwest(SkillRegistry::builtin(), config).unwrap();

    let outcome: SkillOutcome<Value> = dispatcher.run("task_extractor", json!({}), None, None).await;

    assert_eq!(outcome.error_code(), Some(SkillErrorCode::Network));
}

#[tokio::test]
async fn health_treats_only_404_as_down() {
    let dispatcher = dispatcher(SkillsTimeouts { request_secs: 1, connect_secs: 1 }).await;

    let snapshot = dispatcher.probe_health().await;

    assert!(snapshot.dispatcher_available);
    let healthy: Vec<_> = snapshot.per_skill.iter().filter(|s| s.healthy).map(|s| s.id.as_str()).collect();
    // workflow_runner times out and counts as down.
    assert_eq!(healthy, vec!["scheduler", "task_extractor"]);
    assert_eq!(snapshot.per_skill.len(), 7);
}
