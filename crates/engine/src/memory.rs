//! In-memory engine used by integration tests and local development.
//!
//! Implements the same [`EngineClient`] interface as the HTTP client,
//! backed by a scriptable state map. Tests seed workflow states, flip
//! statuses mid-stream, and assert on the updates the gateway forwarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use fable_core::types::{WorkflowRef, WorkflowState};

use crate::client::{EngineClient, EngineError, WorkflowHandle};

/// One update the engine received, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpdate {
    pub workflow_id: String,
    pub operation: String,
    pub args: Option<Value>,
}

#[derive(Default)]
struct Inner {
    states: RwLock<HashMap<String, WorkflowState>>,
    updates: Mutex<Vec<RecordedUpdate>>,
    /// When set, every `query_state` call fails with this message.
    query_failure: RwLock<Option<String>>,
    /// When set, every `execute_update` call fails with this message.
    update_failure: RwLock<Option<String>>,
    query_count: AtomicUsize,
}

/// Scriptable in-memory engine.
#[derive(Clone, Default)]
pub struct InMemoryEngine {
    inner: Arc<Inner>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace the state of one workflow.
    pub async fn set_state(&self, state: WorkflowState) {
        self.inner
            .states
            .write()
            .await
            .insert(state.workflow_id.clone(), state);
    }

    /// Flip the status of a seeded workflow (panics if unknown; test-only).
    pub async fn set_status(&self, workflow_id: &str, status: &str) {
        let mut states = self.inner.states.write().await;
        let state = states
            .get_mut(workflow_id)
            .unwrap_or_else(|| panic!("workflow {workflow_id} not seeded"));
        state.status = status.to_string();
    }

    /// Make all subsequent state queries fail.
    pub async fn fail_queries(&self, message: &str) {
        *self.inner.query_failure.write().await = Some(message.to_string());
    }

    /// Make all subsequent updates fail.
    pub async fn fail_updates(&self, message: &str) {
        *self.inner.update_failure.write().await = Some(message.to_string());
    }

    /// Updates forwarded to this engine, in order.
    pub async fn recorded_updates(&self) -> Vec<RecordedUpdate> {
        self.inner.updates.lock().await.clone()
    }

    /// How many state queries have been made across all workflows.
    pub fn query_count(&self) -> usize {
        self.inner.query_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineClient for InMemoryEngine {
    async fn get_handle(
        &self,
        workflow: &WorkflowRef,
    ) -> Result<Box<dyn WorkflowHandle>, EngineError> {
        Ok(Box::new(InMemoryHandle {
            inner: Arc::clone(&self.inner),
            workflow_id: workflow.as_str().to_string(),
        }))
    }

    async fn query_state(&self, workflow: &WorkflowRef) -> Result<WorkflowState, EngineError> {
        self.inner.query_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.inner.query_failure.read().await.clone() {
            return Err(EngineError::Rejected(message));
        }

        self.inner
            .states
            .read()
            .await
            .get(workflow.as_str())
            .cloned()
            .ok_or_else(|| EngineError::NotFound(workflow.as_str().to_string()))
    }
}

struct InMemoryHandle {
    inner: Arc<Inner>,
    workflow_id: String,
}

#[async_trait]
impl WorkflowHandle for InMemoryHandle {
    async fn execute_update(
        &self,
        operation: &str,
        args: Option<Value>,
    ) -> Result<Value, EngineError> {
        if let Some(message) = self.inner.update_failure.read().await.clone() {
            return Err(EngineError::Rejected(message));
        }

        if !self.inner.states.read().await.contains_key(&self.workflow_id) {
            return Err(EngineError::NotFound(self.workflow_id.clone()));
        }

        self.inner.updates.lock().await.push(RecordedUpdate {
            workflow_id: self.workflow_id.clone(),
            operation: operation.to_string(),
            args,
        });

        Ok(Value::Null)
    }
}
