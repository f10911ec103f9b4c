//! Handler for the server-sent-events progress stream.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use fable_core::types::WorkflowRef;

use crate::gateway::ProgressStreamer;
use crate::state::AppState;

/// GET /api/v1/workflows/{workflow_id}/progress
///
/// Opens a server-sent-events stream of workflow state snapshots.
/// Each frame is one JSON-serialized state (`data: <json>\n\n`); only
/// genuine changes are emitted, and the stream ends after a terminal
/// status frame, after a synthetic error frame, or when the client
/// disconnects. Buffering is disabled for intermediaries so frames
/// arrive with minimal latency.
pub async fn stream_progress(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> impl IntoResponse {
    tracing::info!(workflow_id = %workflow_id, "Progress stream requested");

    let streamer = ProgressStreamer::new(
        Arc::clone(&state.engine),
        state.config.progress_poll_interval,
    );
    let frames = streamer.stream(WorkflowRef::from_id(workflow_id));

    let stream = ReceiverStream::new(frames)
        .map(|frame| Ok::<Event, Infallible>(Event::default().data(frame)));

    (
        [
            ("cache-control", "no-cache"),
            // nginx and friends must not buffer event frames.
            ("x-accel-buffering", "no"),
        ],
        Sse::new(stream),
    )
}
