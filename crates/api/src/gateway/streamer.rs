//! Per-connection workflow progress streaming.
//!
//! Each client connection owns one independent poll task. The task
//! fetches workflow state, diffs it against the last frame it sent
//! (by serialized form), and pushes only genuine changes through an
//! mpsc channel to the transport. The task ends — and its timer with
//! it — when a terminal status has been emitted, when a state query
//! fails, or when the client disconnects.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use fable_core::types::WorkflowRef;
use fable_engine::EngineClient;

/// Default polling interval for progress streams; applied by
/// `ServerConfig` when `PROGRESS_POLL_INTERVAL_MS` is unset.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Buffered frames per connection before backpressure applies.
const FRAME_BUFFER: usize = 16;

/// Spawns and owns progress-stream poll tasks.
pub struct ProgressStreamer {
    engine: Arc<dyn EngineClient>,
    poll_interval: Duration,
}

impl ProgressStreamer {
    pub fn new(engine: Arc<dyn EngineClient>, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
        }
    }

    /// Start streaming one workflow's progress.
    ///
    /// Returns the receiving half of the frame channel; each item is
    /// one JSON-serialized state snapshot (or the synthetic error
    /// frame). Dropping the receiver cancels the poll task.
    pub fn stream(&self, workflow: WorkflowRef) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let engine = Arc::clone(&self.engine);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            poll_loop(engine, workflow, poll_interval, tx).await;
        });

        rx
    }
}

/// The per-connection poll loop.
///
/// The first `interval` tick fires immediately, so the client always
/// gets an instantaneous first frame before anything has changed.
/// At most one state fetch is outstanding at any time.
async fn poll_loop(
    engine: Arc<dyn EngineClient>,
    workflow: WorkflowRef,
    poll_interval: Duration,
    tx: mpsc::Sender<String>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    let mut last_emitted: Option<String> = None;

    tracing::debug!(
        workflow = %workflow,
        poll_interval_ms = poll_interval.as_millis() as u64,
        "Progress stream opened",
    );

    loop {
        tokio::select! {
            // Client went away: stop polling, emit nothing further.
            _ = tx.closed() => {
                tracing::debug!(workflow = %workflow, "Client disconnected, closing progress stream");
                break;
            }
            _ = ticker.tick() => {
                let state = match engine.query_state(&workflow).await {
                    Ok(state) => state,
                    Err(e) => {
                        // A query failure is this stream's own terminal
                        // failure: one descriptive frame, then close.
                        tracing::warn!(workflow = %workflow, error = %e, "State query failed, ending progress stream");
                        let frame = serde_json::json!({
                            "status": "failed",
                            "error": e.to_string(),
                        });
                        let _ = tx.send(frame.to_string()).await;
                        break;
                    }
                };

                let serialized = match serde_json::to_string(&state) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::error!(workflow = %workflow, error = %e, "Failed to serialize workflow state");
                        break;
                    }
                };

                // Emit only genuine changes.
                if last_emitted.as_deref() != Some(serialized.as_str()) {
                    if tx.send(serialized.clone()).await.is_err() {
                        break;
                    }
                    last_emitted = Some(serialized);
                }

                if state.is_terminal() {
                    tracing::debug!(workflow = %workflow, status = %state.status, "Workflow reached terminal status, closing progress stream");
                    break;
                }
            }
        }
    }
}
