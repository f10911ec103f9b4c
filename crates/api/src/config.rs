use std::time::Duration;

use crate::gateway::streamer::DEFAULT_POLL_INTERVAL;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development
/// except `ENGINE_URL`, which must point at a running engine gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    ///
    /// Applied to the command routes only; progress streams are
    /// long-lived by design and must not be cut off by this timeout.
    pub request_timeout_secs: u64,
    /// Base URL of the durable-execution engine's workflow gateway.
    pub engine_url: String,
    /// Poll cadence for progress streams (default: 1000 ms).
    pub progress_poll_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `ENGINE_URL`                | (required)              |
    /// | `PROGRESS_POLL_INTERVAL_MS` | `1000`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let engine_url = std::env::var("ENGINE_URL").expect("ENGINE_URL must be set");

        let progress_poll_interval = match std::env::var("PROGRESS_POLL_INTERVAL_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse()
                    .expect("PROGRESS_POLL_INTERVAL_MS must be a valid u64"),
            ),
            Err(_) => DEFAULT_POLL_INTERVAL,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            engine_url,
            progress_poll_interval,
        }
    }
}
