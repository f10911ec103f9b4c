//! Engine client traits and error type.

use async_trait::async_trait;
use serde_json::Value;

use fable_core::types::{WorkflowRef, WorkflowState};

/// Errors from the engine client layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine has no workflow with the given ID.
    #[error("Workflow not found: {0}")]
    NotFound(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("Engine API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `Retry-After` header, when the engine supplied one.
        retry_after: Option<String>,
        /// Raw response body for debugging.
        body: String,
    },

    /// The engine accepted the request but rejected the update.
    #[error("Update rejected: {0}")]
    Rejected(String),
}

/// Minimal interface to a durable-execution engine.
///
/// Handle acquisition is cheap and stateless; callers construct a
/// fresh handle per request rather than caching them.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Obtain a handle addressing one workflow instance.
    async fn get_handle(
        &self,
        workflow: &WorkflowRef,
    ) -> Result<Box<dyn WorkflowHandle>, EngineError>;

    /// Fetch the current externally-observable state of a workflow.
    async fn query_state(&self, workflow: &WorkflowRef) -> Result<WorkflowState, EngineError>;
}

/// A handle to one workflow instance, able to execute named updates.
#[async_trait]
pub trait WorkflowHandle: Send + Sync {
    /// Execute a single named update against the running workflow.
    async fn execute_update(
        &self,
        operation: &str,
        args: Option<Value>,
    ) -> Result<Value, EngineError>;
}
