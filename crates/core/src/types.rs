//! Workflow addressing and externally-observed workflow state.

use serde::{Deserialize, Serialize};

/// Statuses after which a workflow instance no longer changes.
pub const TERMINAL_STATUSES: &[&str] = &["completed", "failed", "cancelled"];

/// Address of one workflow instance inside the durable-execution engine.
///
/// Derived deterministically from the book ID (`book-<bookId>`) and
/// constructed per request; never cached or persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkflowRef(String);

impl WorkflowRef {
    /// Derive the workflow reference for a book.
    pub fn for_book(book_id: &str) -> Self {
        Self(format!("book-{book_id}"))
    }

    /// Wrap an already-derived workflow ID (e.g. from a stream URL).
    pub fn from_id(workflow_id: impl Into<String>) -> Self {
        Self(workflow_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One workflow state snapshot as reported by the engine.
///
/// The engine owns this shape; the gateway never mutates it, only
/// diffs successive snapshots by serialized form. Fields beyond the
/// ones the gateway reads are preserved in `extra` so frames forwarded
/// to clients stay byte-faithful to what the engine reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub workflow_id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub updates: Vec<serde_json::Value>,
    /// Kept as a string: the engine's status vocabulary is open-ended
    /// and the gateway only distinguishes terminal from non-terminal.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowState {
    /// Whether this snapshot's status means the workflow is done.
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
    }
}
