//! Command dispatch into running workflow instances.
//!
//! One [`dispatch`](CommandDispatcher::dispatch) call forwards exactly
//! one update operation to the engine. Validation happens before this
//! layer (a constructed [`UpdateCommand`] is already shape-checked),
//! and no automatic retry happens after it: a failed update surfaces
//! as-is, and retrying user-facing commands is the client's decision.

use std::sync::Arc;

use fable_core::command::UpdateCommand;
use fable_core::types::WorkflowRef;
use fable_engine::{EngineClient, EngineError};

/// Stateless dispatcher over an engine client.
///
/// Safe to construct per request; concurrent dispatches never contend
/// in this layer. Two concurrent updates for the same book may race at
/// the engine, which owns ordering and conflict resolution.
pub struct CommandDispatcher {
    engine: Arc<dyn EngineClient>,
}

impl CommandDispatcher {
    pub fn new(engine: Arc<dyn EngineClient>) -> Self {
        Self { engine }
    }

    /// Forward one validated command to the book's workflow instance.
    pub async fn dispatch(
        &self,
        book_id: &str,
        command: &UpdateCommand,
    ) -> Result<(), EngineError> {
        let workflow = WorkflowRef::for_book(book_id);

        // One observability record per call; the payload preview is
        // size-capped so log volume stays bounded.
        tracing::info!(
            book_id,
            kind = command.kind(),
            workflow = %workflow,
            payload_preview = %command.payload_preview(),
            "Dispatching workflow update",
        );

        let handle = self.engine.get_handle(&workflow).await?;
        handle
            .execute_update(command.operation(), command.args())
            .await?;

        Ok(())
    }
}
