//! Indexing response handle.

use serde_json::Value;

use crate::errors::SearchError;
use crate::index::Index;
use crate::request_options::RequestOptions;
use crate::tasks::WaitTaskOptions;
use search_client_shared::WriteResponse;

/// Acknowledgement of a mutating call.
///
/// Pairs the server-issued task identifier with the raw provider payload and
/// the index the write was issued against. The underlying task is applied
/// asynchronously; [`wait`](IndexingResponse::wait) blocks until the provider
/// reports it complete.
///
/// Responses are independent: waiting on one polls only its own task, so
/// multiple responses may be awaited concurrently.
#[derive(Debug, Clone)]
pub struct IndexingResponse {
    task_id: String,
    raw: Value,
    index: Index,
}

impl IndexingResponse {
    pub(crate) fn new(response: WriteResponse, index: Index) -> Self {
        Self {
            task_id: response.task_id,
            raw: response.raw,
            index,
        }
    }

    /// The server-issued task identifier.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// The raw provider acknowledgement payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The index this write was issued against.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Wait until the provider reports the task complete.
    ///
    /// Polls indefinitely; see [`wait_with_options`](Self::wait_with_options)
    /// for a bounded wait.
    pub async fn wait(&self) -> Result<(), SearchError> {
        self.index.wait_task(&self.task_id).await
    }

    /// Wait with an explicit attempt cap.
    pub async fn wait_with_options(&self, wait: &WaitTaskOptions) -> Result<(), SearchError> {
        self.index
            .wait_task_with_options(&self.task_id, RequestOptions::new(), wait)
            .await
    }
}
