//! Write acknowledgement and task status payload helpers.
//!
//! Every mutating call is acknowledged with a server-issued task identifier;
//! the task is applied asynchronously and can be polled for completion.

use serde_json::Value;

/// Status value the provider reports once a task has been applied.
pub const TASK_PUBLISHED: &str = "published";

/// The result of a dispatcher write: the task identifier the provider issued,
/// plus the raw acknowledgement payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResponse {
    /// Server-issued task identifier, opaque to the client.
    pub task_id: String,
    /// The provider's acknowledgement payload, unmodified.
    pub raw: Value,
}

impl WriteResponse {
    /// Pair a task identifier with its raw payload.
    pub fn new(task_id: impl Into<String>, raw: Value) -> Self {
        Self {
            task_id: task_id.into(),
            raw,
        }
    }

    /// Build a response from a raw acknowledgement payload, reading the
    /// provider's `taskID` field. The provider sends integer identifiers;
    /// string identifiers are accepted as well.
    pub fn from_raw(raw: Value) -> Option<Self> {
        let task_id = match raw.get("taskID") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return None,
        };
        Some(Self { task_id, raw })
    }
}

/// Read the status field of a get-task payload.
pub fn task_status(raw: &Value) -> Option<&str> {
    raw.get("status").and_then(Value::as_str)
}

/// Whether a get-task payload reports the completion sentinel.
pub fn is_published(raw: &Value) -> bool {
    task_status(raw) == Some(TASK_PUBLISHED)
}
