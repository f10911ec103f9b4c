//! Handler for the workflow command endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use fable_core::command::UpdateCommand;

use crate::error::{AppError, AppResult};
use crate::gateway::CommandDispatcher;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/commands`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub book_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Response body on successful dispatch.
#[derive(Debug, Serialize)]
pub struct CommandAccepted {
    pub ok: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// POST /api/v1/commands
///
/// Validates the command's payload shape against its kind and forwards
/// exactly one update to the book's workflow instance. Validation
/// failures are rejected before any side effect; engine failures come
/// back as 502 with the original message.
pub async fn submit_command(
    State(state): State<AppState>,
    Json(input): Json<CommandRequest>,
) -> AppResult<Json<DataResponse<CommandAccepted>>> {
    if input.book_id.trim().is_empty() {
        return Err(AppError::BadRequest("bookId must not be empty".into()));
    }

    let command = UpdateCommand::from_parts(&input.kind, input.payload)?;

    let dispatcher = CommandDispatcher::new(Arc::clone(&state.engine));
    dispatcher.dispatch(&input.book_id, &command).await?;

    Ok(Json(DataResponse {
        data: CommandAccepted {
            ok: true,
            kind: command.kind(),
        },
    }))
}
