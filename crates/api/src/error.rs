use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fable_core::error::CoreError;
use fable_engine::EngineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`EngineError`] for
/// upstream failures. Implements [`IntoResponse`] to produce
/// consistent JSON error responses: validation problems are
/// 4xx-equivalent and user-correctable, upstream failures surface the
/// original message with a 5xx status, and nothing here is fatal to
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fable_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An engine or provider call failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // Engine failures are never swallowed: the original message
            // goes back to the caller so production issues can be traced
            // without grepping server logs.
            AppError::Engine(err) => {
                tracing::error!(error = %err, "Engine call failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
