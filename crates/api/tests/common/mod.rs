#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fable_api::config::ServerConfig;
use fable_api::router::build_app_router;
use fable_api::state::AppState;
use fable_core::types::WorkflowState;
use fable_engine::InMemoryEngine;

/// Build a test `ServerConfig` with safe defaults and a fast poll
/// cadence so streaming tests finish quickly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        engine_url: "http://engine.invalid".to_string(),
        progress_poll_interval: Duration::from_millis(25),
    }
}

/// Build the full application router backed by the given in-memory
/// engine.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(engine: InMemoryEngine) -> Router {
    let config = test_config();
    let state = AppState {
        engine: Arc::new(engine),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seed one workflow in the given status.
pub async fn seed_workflow(engine: &InMemoryEngine, workflow_id: &str, status: &str) {
    let state: WorkflowState = serde_json::from_value(serde_json::json!({
        "workflowId": workflow_id,
        "startedAt": "2025-01-01T00:00:00Z",
        "status": status,
    }))
    .unwrap();
    engine.set_state(state).await;
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse the `data:` payloads out of a collected SSE body.
pub fn sse_frames(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|chunk| chunk.strip_prefix("data: "))
        .map(|payload| serde_json::from_str(payload).expect("frame payload is JSON"))
        .collect()
}
