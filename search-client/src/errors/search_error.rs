//! Search client error type.
//!
//! This module defines the unified error type for all client operations.
//! Validation errors are raised locally before any dispatch; everything the
//! dispatcher reports is propagated unchanged as a remote failure.

use thiserror::Error;

/// Unified errors from search client operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// A caller-supplied identifier (task ID, object ID, destination name)
    /// is empty or missing. Raised before any network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// One or more records in a batch lack the required identity field.
    /// Raised before any network call, naming the operation.
    #[error("Invalid record in {operation}: {reason}")]
    InvalidRecord { operation: String, reason: String },

    /// The dispatcher reported a transport- or service-level failure.
    /// The client does not interpret status codes or retry.
    #[error("Remote operation failed: {0}")]
    RemoteFailure(String),

    /// A provider payload was missing an expected field.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A bounded task wait gave up before the provider reported completion.
    /// Only reachable through the opt-in attempt cap.
    #[error("Task {task_id} not completed after {attempts} attempts")]
    WaitExhausted { task_id: String, attempts: u32 },
}

impl SearchError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid record error naming the operation that required
    /// the identity.
    pub fn invalid_record(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a remote failure error.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a wait exhausted error.
    pub fn wait_exhausted(task_id: impl Into<String>, attempts: u32) -> Self {
        Self::WaitExhausted {
            task_id: task_id.into(),
            attempts,
        }
    }
}
