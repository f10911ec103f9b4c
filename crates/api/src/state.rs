use std::sync::Arc;

use fable_engine::EngineClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The engine
/// client is the only stateful collaborator; command dispatch and
/// progress streaming both construct their per-request objects from it.
#[derive(Clone)]
pub struct AppState {
    /// Client for the durable-execution engine.
    pub engine: Arc<dyn EngineClient>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
