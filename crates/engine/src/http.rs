//! HTTP implementation of the engine client, using [`reqwest`].
//!
//! Talks to the engine's workflow gateway REST surface:
//!
//! - `GET  {base}/workflows/{id}/state`
//! - `POST {base}/workflows/{id}/updates/{operation}`
//!
//! No retries happen here: the dispatcher surfaces update failures
//! as-is, and the streamer treats query failures as terminal. Upstream
//! rate-limit hints are carried on [`EngineError::Api`] so callers
//! that do retry (pipeline stages, via `crate::retry`) can honor them.

use async_trait::async_trait;
use serde_json::Value;

use fable_core::types::{WorkflowRef, WorkflowState};

use crate::client::{EngineClient, EngineError, WorkflowHandle};

/// HTTP client for one engine deployment.
pub struct HttpEngineClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngineClient {
    /// Create a client for the engine at `base_url` (e.g. `http://engine:7233`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across components).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn get_handle(
        &self,
        workflow: &WorkflowRef,
    ) -> Result<Box<dyn WorkflowHandle>, EngineError> {
        Ok(Box::new(HttpWorkflowHandle {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            workflow_id: workflow.as_str().to_string(),
        }))
    }

    async fn query_state(&self, workflow: &WorkflowRef) -> Result<WorkflowState, EngineError> {
        let url = format!("{}/workflows/{}/state", self.base_url, workflow);
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound(workflow.as_str().to_string()));
        }

        let response = into_api_error(response).await?;
        Ok(response.json::<WorkflowState>().await?)
    }
}

/// Per-request handle addressing one workflow over HTTP.
struct HttpWorkflowHandle {
    client: reqwest::Client,
    base_url: String,
    workflow_id: String,
}

#[async_trait]
impl WorkflowHandle for HttpWorkflowHandle {
    async fn execute_update(
        &self,
        operation: &str,
        args: Option<Value>,
    ) -> Result<Value, EngineError> {
        let url = format!(
            "{}/workflows/{}/updates/{operation}",
            self.base_url, self.workflow_id
        );

        let response = self
            .client
            .post(url)
            .json(&args.unwrap_or(Value::Null))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound(self.workflow_id.clone()));
        }

        let response = into_api_error(response).await?;
        // Updates may complete with an empty body.
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }
}

/// Convert a non-2xx response into [`EngineError::Api`], preserving
/// the `Retry-After` header and body text for the caller.
async fn into_api_error(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();

    Err(EngineError::Api {
        status: status.as_u16(),
        retry_after,
        body,
    })
}
