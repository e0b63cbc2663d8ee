//! Batch operation wire types.
//!
//! A batch write to the provider is a list of `{action, body}` entries sent in
//! one request. Entry order within a request is preserved by the provider.

use serde::{Deserialize, Serialize};

use crate::types::record::Record;

/// The operation a batch entry applies to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchAction {
    /// Add or fully replace a record under its identity.
    #[serde(rename = "addObject")]
    AddObject,
    /// Update fields of an existing record; missing records are not created.
    #[serde(rename = "partialUpdateObjectNoCreate")]
    UpdateObjectNoCreate,
    /// Update fields of a record, creating it when absent.
    #[serde(rename = "partialUpdateObject")]
    UpsertObject,
    /// Delete the record addressed by the entry's identity.
    #[serde(rename = "deleteObject")]
    DeleteObject,
}

impl BatchAction {
    /// The provider's wire tag for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchAction::AddObject => "addObject",
            BatchAction::UpdateObjectNoCreate => "partialUpdateObjectNoCreate",
            BatchAction::UpsertObject => "partialUpdateObject",
            BatchAction::DeleteObject => "deleteObject",
        }
    }

    /// Whether every record in a batch of this action must already carry an
    /// identity. Delete entries carry the identity by construction, so they
    /// are exempt here.
    pub fn requires_object_id(&self) -> bool {
        !matches!(self, BatchAction::DeleteObject)
    }
}

/// One operation within a batch request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEntry {
    /// The operation to apply.
    pub action: BatchAction,
    /// The record the operation applies to.
    pub body: Record,
}

impl BatchEntry {
    /// Create an entry pairing an action with its record.
    pub fn new(action: BatchAction, body: Record) -> Self {
        Self { action, body }
    }
}

/// The body of a batch write: an ordered list of entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchRequest {
    /// Entries applied in order within one provider request.
    pub requests: Vec<BatchEntry>,
}

impl BatchRequest {
    /// Wrap a list of entries into a request body.
    pub fn new(requests: Vec<BatchEntry>) -> Self {
        Self { requests }
    }
}
