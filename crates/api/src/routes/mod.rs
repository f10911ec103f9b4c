pub mod health;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /commands                                 submit a workflow update (POST)
/// /workflows/{workflow_id}/progress         SSE progress stream (GET)
/// ```
///
/// The request timeout applies to the command route only: progress
/// streams are long-lived by design and must outlive any per-request
/// deadline.
pub fn api_routes(request_timeout: Duration) -> Router<AppState> {
    let commands = Router::new()
        .route("/commands", post(handlers::commands::submit_command))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    let progress = Router::new().route(
        "/workflows/{workflow_id}/progress",
        get(handlers::progress::stream_progress),
    );

    commands.merge(progress)
}
