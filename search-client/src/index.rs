//! Index handle and per-resource operations.
//!
//! An [`Index`] addresses one named index on the provider. It composes paths
//! and payloads, validates caller input before any dispatch, and delegates
//! transport to the injected [`RequestDispatcher`]. Every mutating call is
//! acknowledged with an [`IndexingResponse`] carrying the server-issued task
//! identifier.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::batch;
use crate::browse::{BrowseIterator, BrowseKind};
use crate::config::SearchConfig;
use crate::errors::SearchError;
use crate::interfaces::{HttpMethod, RequestDispatcher};
use crate::paths;
use crate::request_options::RequestOptions;
use crate::response::IndexingResponse;
use crate::tasks::{self, WaitTaskOptions};
use search_client_shared::{is_published, BatchAction, BatchEntry, BatchRequest, Record};

/// Resource kinds an index-to-index copy can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyScope {
    Settings,
    Synonyms,
    Rules,
}

impl CopyScope {
    /// All non-object resource kinds.
    pub const ALL: [CopyScope; 3] = [CopyScope::Settings, CopyScope::Synonyms, CopyScope::Rules];
}

/// A handle on one named index.
///
/// Holds the index name, the injected dispatcher, and the client
/// configuration. Handles are cheap to clone and share the dispatcher.
#[derive(Clone)]
pub struct Index {
    name: String,
    dispatcher: Arc<dyn RequestDispatcher>,
    config: SearchConfig,
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Index {
    /// Create a handle on the named index.
    pub fn new(
        name: impl Into<String>,
        dispatcher: Arc<dyn RequestDispatcher>,
        config: SearchConfig,
    ) -> Self {
        Self {
            name: name.into(),
            dispatcher,
            config,
        }
    }

    /// The index name this handle addresses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub(crate) fn dispatcher(&self) -> &Arc<dyn RequestDispatcher> {
        &self.dispatcher
    }

    fn path(&self, suffix: &str) -> String {
        paths::index_path(&self.name, suffix)
    }

    /// Defaults injected into replica-forwarded writes. Empty when the
    /// tri-state config flag is unset, so the flag is omitted entirely.
    fn replica_defaults(&self) -> RequestOptions {
        let mut defaults = RequestOptions::new();
        if let Some(forward) = self.config.default_forward_to_replicas {
            defaults.set_query_parameter("forwardToReplicas", forward);
        }
        defaults
    }

    fn ensure_identifier(value: &str, what: &str) -> Result<(), SearchError> {
        if value.is_empty() {
            return Err(SearchError::invalid_argument(format!(
                "{} cannot be empty",
                what
            )));
        }
        Ok(())
    }

    fn single_response(
        mut responses: Vec<IndexingResponse>,
    ) -> Result<IndexingResponse, SearchError> {
        responses
            .pop()
            .ok_or_else(|| SearchError::parse("provider returned no batch acknowledgement"))
    }

    // ---- queries ----------------------------------------------------------

    /// Run a search query against the index.
    pub async fn search(
        &self,
        query: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        let options = options.with_body_parameter("query", query);
        self.dispatcher
            .read(HttpMethod::Post, &self.path("/query"), &options)
            .await
    }

    /// Fetch one record by identity.
    pub async fn get_object(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        Self::ensure_identifier(object_id, "objectID")?;
        self.dispatcher
            .read(
                HttpMethod::Get,
                &self.path(&format!("/{}", paths::encode(object_id))),
                &options,
            )
            .await
    }

    /// Fetch several records by identity through the multi-index lookup
    /// endpoint, optionally restricting the attributes returned.
    pub async fn get_objects(
        &self,
        object_ids: &[&str],
        attributes_to_retrieve: Option<&[&str]>,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        let mut requests = Vec::with_capacity(object_ids.len());
        for object_id in object_ids {
            Self::ensure_identifier(object_id, "objectID")?;
            let mut request = json!({
                "indexName": self.name,
                "objectID": object_id,
            });
            if let Some(attributes) = attributes_to_retrieve {
                request["attributesToRetrieve"] = json!(attributes);
            }
            requests.push(request);
        }

        let options = options.with_body_parameter("requests", Value::Array(requests));
        self.dispatcher
            .read(HttpMethod::Post, paths::MULTI_INDEX_OBJECTS, &options)
            .await
    }

    /// Fetch the index settings.
    pub async fn get_settings(&self, options: RequestOptions) -> Result<Value, SearchError> {
        let options = options.with_query_parameter("getVersion", 2);
        self.dispatcher
            .read(HttpMethod::Get, &self.path("/settings"), &options)
            .await
    }

    // ---- object writes ----------------------------------------------------

    /// Save one record, fully replacing any record under the same identity.
    pub async fn save_object(
        &self,
        object: Record,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::single_response(self.save_objects(vec![object], options).await?)
    }

    /// Save records, fully replacing records under the same identities.
    ///
    /// Input is chunked by the configured batch size and dispatched one chunk
    /// at a time in input order; each chunk is acknowledged independently.
    pub async fn save_objects(
        &self,
        objects: Vec<Record>,
        options: RequestOptions,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        self.batch_records(objects, BatchAction::AddObject, "save_objects", options)
            .await
    }

    /// Update fields of one existing record; a missing record is not created.
    pub async fn partial_update_object(
        &self,
        object: Record,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::single_response(self.partial_update_objects(vec![object], options).await?)
    }

    /// Update fields of existing records; missing records are not created.
    pub async fn partial_update_objects(
        &self,
        objects: Vec<Record>,
        options: RequestOptions,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        self.batch_records(
            objects,
            BatchAction::UpdateObjectNoCreate,
            "partial_update_objects",
            options,
        )
        .await
    }

    /// Update fields of one record, creating it when absent.
    pub async fn partial_update_or_create_object(
        &self,
        object: Record,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::single_response(
            self.partial_update_or_create_objects(vec![object], options)
                .await?,
        )
    }

    /// Update fields of records, creating any that are absent.
    pub async fn partial_update_or_create_objects(
        &self,
        objects: Vec<Record>,
        options: RequestOptions,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        self.batch_records(
            objects,
            BatchAction::UpsertObject,
            "partial_update_or_create_objects",
            options,
        )
        .await
    }

    /// Delete one record by identity.
    pub async fn delete_object(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::single_response(self.delete_objects(&[object_id], options).await?)
    }

    /// Delete records by identity.
    ///
    /// Delete entries are keyed only by identity and route through the same
    /// batch path as saves.
    pub async fn delete_objects(
        &self,
        object_ids: &[&str],
        options: RequestOptions,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        let mut records = Vec::with_capacity(object_ids.len());
        for object_id in object_ids {
            Self::ensure_identifier(object_id, "objectID")?;
            let mut record = Record::new();
            record.insert("objectID".to_string(), json!(object_id));
            records.push(record);
        }
        self.batch_records(records, BatchAction::DeleteObject, "delete_objects", options)
            .await
    }

    /// Delete every record matching the given filter arguments.
    pub async fn delete_by(
        &self,
        args: Map<String, Value>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let body = json!({ "params": paths::build_query(&args) });
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/deleteByQuery"),
                body,
                &options,
                &RequestOptions::new(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Remove every record from the index, keeping settings, synonyms, and
    /// rules in place.
    pub async fn clear(&self, options: RequestOptions) -> Result<IndexingResponse, SearchError> {
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/clear"),
                json!({}),
                &options,
                &RequestOptions::new(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Send one batch of entries as a single atomic provider request.
    ///
    /// Entry order within the request is preserved by the provider. Callers
    /// with more entries than the configured batch size should go through
    /// the chunking save/update/delete operations instead.
    pub async fn batch(
        &self,
        requests: Vec<BatchEntry>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let body = serde_json::to_value(BatchRequest::new(requests))
            .map_err(|e| SearchError::parse(e.to_string()))?;
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/batch"),
                body,
                &options,
                &RequestOptions::new(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Chunk records through the batch assembler and dispatch sequentially,
    /// one acknowledgement per chunk, in input order. A later chunk is not
    /// dispatched before the earlier chunk's acknowledgement arrives.
    async fn batch_records(
        &self,
        records: Vec<Record>,
        action: BatchAction,
        operation: &str,
        options: RequestOptions,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        let chunks = batch::assemble(records, action, self.config.batch_size, operation)?;

        let mut responses = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            debug!(
                index = %self.name,
                operation,
                chunk_len = chunk.len(),
                "Dispatching batch chunk"
            );
            responses.push(self.batch(chunk, options.clone()).await?);
        }
        Ok(responses)
    }

    // ---- settings ---------------------------------------------------------

    /// Overwrite the index settings. Not a merge: the supplied settings
    /// replace the previous ones wholesale.
    pub async fn set_settings(
        &self,
        settings: Value,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let response = self
            .dispatcher
            .write(
                HttpMethod::Put,
                &self.path("/settings"),
                settings,
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    // ---- synonyms ---------------------------------------------------------

    /// Search the index's synonyms.
    pub async fn search_synonyms(
        &self,
        query: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        let options = options.with_body_parameter("query", query);
        self.dispatcher
            .read(HttpMethod::Post, &self.path("/synonyms/search"), &options)
            .await
    }

    /// Fetch one synonym by identity.
    pub async fn get_synonym(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        Self::ensure_identifier(object_id, "objectID")?;
        self.dispatcher
            .read(
                HttpMethod::Get,
                &self.path(&format!("/synonyms/{}", paths::encode(object_id))),
                &options,
            )
            .await
    }

    /// Save one synonym.
    pub async fn save_synonym(
        &self,
        synonym: Record,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        self.save_synonyms(vec![synonym], options).await
    }

    /// Save synonyms as one batch write.
    ///
    /// An additive upsert by identity: existing synonyms under other
    /// identities are untouched. Synonym batches are not chunked; the
    /// provider accepts the full set in one call.
    pub async fn save_synonyms(
        &self,
        synonyms: Vec<Record>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        batch::ensure_object_ids(&synonyms, "save_synonyms")?;

        let body = Value::Array(synonyms.into_iter().map(Value::Object).collect());
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/synonyms/batch"),
                body,
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Save synonyms, instructing the service to clear all existing synonyms
    /// first. A server-side semantic, not a client-side clear-then-save.
    pub async fn replace_all_synonyms(
        &self,
        synonyms: Vec<Record>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let options = options.with_query_parameter("replaceExistingSynonyms", true);
        self.save_synonyms(synonyms, options).await
    }

    /// Delete one synonym by identity.
    pub async fn delete_synonym(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::ensure_identifier(object_id, "objectID")?;
        let response = self
            .dispatcher
            .write(
                HttpMethod::Delete,
                &self.path(&format!("/synonyms/{}", paths::encode(object_id))),
                json!({}),
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Remove every synonym from the index.
    pub async fn clear_synonyms(
        &self,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/synonyms/clear"),
                json!({}),
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    // ---- rules ------------------------------------------------------------

    /// Search the index's rules.
    pub async fn search_rules(
        &self,
        query: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        let options = options.with_body_parameter("query", query);
        self.dispatcher
            .read(HttpMethod::Post, &self.path("/rules/search"), &options)
            .await
    }

    /// Fetch one rule by identity.
    pub async fn get_rule(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        Self::ensure_identifier(object_id, "objectID")?;
        self.dispatcher
            .read(
                HttpMethod::Get,
                &self.path(&format!("/rules/{}", paths::encode(object_id))),
                &options,
            )
            .await
    }

    /// Save one rule.
    pub async fn save_rule(
        &self,
        rule: Record,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        self.save_rules(vec![rule], options).await
    }

    /// Save rules as one batch write, upserting by identity.
    pub async fn save_rules(
        &self,
        rules: Vec<Record>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        batch::ensure_object_ids(&rules, "save_rules")?;

        let body = Value::Array(rules.into_iter().map(Value::Object).collect());
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/rules/batch"),
                body,
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Save rules, instructing the service to clear all existing rules first.
    pub async fn replace_all_rules(
        &self,
        rules: Vec<Record>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let options = options.with_query_parameter("clearExistingRules", true);
        self.save_rules(rules, options).await
    }

    /// Delete one rule by identity.
    pub async fn delete_rule(
        &self,
        object_id: &str,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::ensure_identifier(object_id, "objectID")?;
        let response = self
            .dispatcher
            .write(
                HttpMethod::Delete,
                &self.path(&format!("/rules/{}", paths::encode(object_id))),
                json!({}),
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Remove every rule from the index.
    pub async fn clear_rules(
        &self,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/rules/clear"),
                json!({}),
                &options,
                &self.replica_defaults(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    // ---- browse -----------------------------------------------------------

    /// Lazily enumerate the index's records.
    pub fn browse(&self, options: RequestOptions) -> BrowseIterator {
        BrowseIterator::new(self.clone(), BrowseKind::Objects, options)
    }

    /// Lazily enumerate the index's synonyms.
    pub fn browse_synonyms(&self, options: RequestOptions) -> BrowseIterator {
        BrowseIterator::new(self.clone(), BrowseKind::Synonyms, options)
    }

    /// Lazily enumerate the index's rules.
    pub fn browse_rules(&self, options: RequestOptions) -> BrowseIterator {
        BrowseIterator::new(self.clone(), BrowseKind::Rules, options)
    }

    // ---- index-to-index operations ----------------------------------------

    /// Copy this index onto `destination`, optionally scoped to a subset of
    /// resource kinds. An unscoped copy clones everything, records included.
    pub async fn copy_to(
        &self,
        destination: &str,
        scope: Option<&[CopyScope]>,
        options: RequestOptions,
    ) -> Result<IndexingResponse, SearchError> {
        Self::ensure_identifier(destination, "destination index name")?;

        let mut body = json!({
            "operation": "copy",
            "destination": destination,
        });
        if let Some(scope) = scope {
            body["scope"] = serde_json::to_value(scope).map_err(|e| SearchError::parse(e.to_string()))?;
        }

        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/operation"),
                body,
                &options,
                &RequestOptions::new(),
            )
            .await?;
        Ok(IndexingResponse::new(response, self.clone()))
    }

    /// Atomically rename this index onto `destination`.
    ///
    /// This is the promotion commit point: before it, readers of
    /// `destination` see its previous contents; after it, they see this
    /// index's contents, with nothing in between. Consumes the handle and
    /// returns a new one bound to the destination name — the old name no
    /// longer addresses a distinct index. The acknowledgement's owning index
    /// is the returned handle, so waiting on it polls the destination.
    pub async fn move_to(
        self,
        destination: &str,
        options: RequestOptions,
    ) -> Result<(Index, IndexingResponse), SearchError> {
        Self::ensure_identifier(destination, "destination index name")?;

        let body = json!({
            "operation": "move",
            "destination": destination,
        });
        let response = self
            .dispatcher
            .write(
                HttpMethod::Post,
                &self.path("/operation"),
                body,
                &options,
                &RequestOptions::new(),
            )
            .await?;

        info!(from = %self.name, to = %destination, "Index moved");

        let moved = Index::new(destination, Arc::clone(&self.dispatcher), self.config.clone());
        let response = IndexingResponse::new(response, moved.clone());
        Ok((moved, response))
    }

    // ---- tasks ------------------------------------------------------------

    /// Fetch the status payload of one asynchronous task.
    pub async fn get_task(
        &self,
        task_id: &str,
        options: RequestOptions,
    ) -> Result<Value, SearchError> {
        Self::ensure_identifier(task_id, "taskID")?;
        self.dispatcher
            .read(
                HttpMethod::Get,
                &self.path(&format!("/task/{}", paths::encode(task_id))),
                &options,
            )
            .await
    }

    /// Wait until the provider reports a task complete.
    ///
    /// Polls with a stepped backoff and no attempt cap: a task that never
    /// completes blocks its waiter indefinitely. Use
    /// [`wait_task_with_options`](Self::wait_task_with_options) to bound the
    /// wait explicitly.
    pub async fn wait_task(&self, task_id: &str) -> Result<(), SearchError> {
        self.wait_task_with_options(task_id, RequestOptions::new(), &WaitTaskOptions::default())
            .await
    }

    /// Wait for a task with explicit request and wait options.
    #[instrument(skip(self, options, wait), fields(index = %self.name))]
    pub async fn wait_task_with_options(
        &self,
        task_id: &str,
        options: RequestOptions,
        wait: &WaitTaskOptions,
    ) -> Result<(), SearchError> {
        Self::ensure_identifier(task_id, "taskID")?;

        let base = self.config.wait_task_time_before_retry;
        let mut attempt: u32 = 1;
        loop {
            let status = self.get_task(task_id, options.clone()).await?;
            if is_published(&status) {
                debug!(task_id, attempts = attempt, "Task published");
                return Ok(());
            }

            if let Some(max_attempts) = wait.max_attempts {
                if attempt >= max_attempts {
                    return Err(SearchError::wait_exhausted(task_id, attempt));
                }
            }

            attempt += 1;
            let delay = tasks::retry_delay(attempt, base);
            debug!(
                task_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Task not yet published, backing off"
            );
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use search_client_shared::WriteResponse;

    #[derive(Debug, Clone)]
    struct RecordedCall {
        method: HttpMethod,
        path: String,
        body: Value,
        options: RequestOptions,
        defaults: RequestOptions,
    }

    /// Recording dispatcher for testing. Reads pop from a queued list of
    /// responses; writes are acknowledged with sequential task identifiers.
    struct MockDispatcher {
        calls: Mutex<Vec<RecordedCall>>,
        read_responses: Mutex<VecDeque<Value>>,
        next_task: AtomicUsize,
    }

    impl MockDispatcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                read_responses: Mutex::new(VecDeque::new()),
                next_task: AtomicUsize::new(1),
            })
        }

        fn queue_read(&self, value: Value) {
            self.read_responses.lock().unwrap().push_back(value);
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RequestDispatcher for MockDispatcher {
        async fn read(
            &self,
            method: HttpMethod,
            path: &str,
            options: &RequestOptions,
        ) -> Result<Value, SearchError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                path: path.to_string(),
                body: Value::Null,
                options: options.clone(),
                defaults: RequestOptions::new(),
            });
            Ok(self
                .read_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| json!({})))
        }

        async fn write(
            &self,
            method: HttpMethod,
            path: &str,
            body: Value,
            options: &RequestOptions,
            defaults: &RequestOptions,
        ) -> Result<WriteResponse, SearchError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                path: path.to_string(),
                body,
                options: options.clone(),
                defaults: defaults.clone(),
            });
            let task = self.next_task.fetch_add(1, Ordering::SeqCst);
            Ok(WriteResponse::new(
                task.to_string(),
                json!({"taskID": task}),
            ))
        }
    }

    fn test_index(dispatcher: Arc<MockDispatcher>) -> Index {
        test_index_with_config(dispatcher, SearchConfig::default())
    }

    fn test_index_with_config(dispatcher: Arc<MockDispatcher>, config: SearchConfig) -> Index {
        Index::new("products", dispatcher, config)
    }

    fn object(id: usize) -> Record {
        let mut record = Record::new();
        record.insert("objectID".to_string(), json!(format!("obj-{}", id)));
        record.insert("rank".to_string(), json!(id));
        record
    }

    #[tokio::test]
    async fn test_save_objects_chunks_in_order() {
        let dispatcher = MockDispatcher::new();
        let index = test_index_with_config(dispatcher.clone(), SearchConfig::with_batch_size(10));

        let objects: Vec<Record> = (0..25).map(object).collect();
        let responses = index
            .save_objects(objects, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(responses.len(), 3);

        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|call| call.path == "/1/indexes/products/batch"));

        let sizes: Vec<usize> = calls
            .iter()
            .map(|call| call.body["requests"].as_array().unwrap().len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        // Submission order matches input order across chunk boundaries.
        let first_of_second = &calls[1].body["requests"][0]["body"]["rank"];
        assert_eq!(first_of_second, &json!(10));
        assert_eq!(
            calls[0].body["requests"][0]["action"],
            json!("addObject")
        );
    }

    #[tokio::test]
    async fn test_save_objects_missing_identity_dispatches_nothing() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let mut objects = vec![object(1)];
        objects.push(Record::new());

        let err = index
            .save_objects(objects, RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::InvalidRecord { .. }));
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_object_single() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let response = index
            .save_object(object(7), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.task_id(), "1");
        assert_eq!(response.index().name(), "products");
        assert_eq!(dispatcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_objects_action_tag() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .partial_update_objects(vec![object(1)], RequestOptions::new())
            .await
            .unwrap();
        index
            .partial_update_or_create_objects(vec![object(2)], RequestOptions::new())
            .await
            .unwrap();

        let calls = dispatcher.calls();
        assert_eq!(
            calls[0].body["requests"][0]["action"],
            json!("partialUpdateObjectNoCreate")
        );
        assert_eq!(
            calls[1].body["requests"][0]["action"],
            json!("partialUpdateObject")
        );
    }

    #[tokio::test]
    async fn test_delete_objects_builds_identity_entries() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .delete_objects(&["a", "b"], RequestOptions::new())
            .await
            .unwrap();

        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body["requests"],
            json!([
                {"action": "deleteObject", "body": {"objectID": "a"}},
                {"action": "deleteObject", "body": {"objectID": "b"}},
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_objects_empty_id_rejected() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let err = index
            .delete_objects(&["a", ""], RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::InvalidArgument(_)));
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_settings_injects_forwarding_default() {
        let dispatcher = MockDispatcher::new();
        let config = SearchConfig::default().forward_to_replicas(true);
        let index = test_index_with_config(dispatcher.clone(), config);

        index
            .set_settings(json!({"hitsPerPage": 20}), RequestOptions::new())
            .await
            .unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.method, HttpMethod::Put);
        assert_eq!(call.path, "/1/indexes/products/settings");
        assert_eq!(
            call.defaults.query_parameters()["forwardToReplicas"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn test_forwarding_flag_omitted_when_unset() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .set_settings(json!({}), RequestOptions::new())
            .await
            .unwrap();

        assert!(dispatcher.calls()[0].defaults.is_empty());
    }

    #[tokio::test]
    async fn test_caller_forwarding_value_reaches_dispatcher_unchanged() {
        let dispatcher = MockDispatcher::new();
        let config = SearchConfig::default().forward_to_replicas(true);
        let index = test_index_with_config(dispatcher.clone(), config);

        let options = RequestOptions::new().with_query_parameter("forwardToReplicas", false);
        index.clear_synonyms(options).await.unwrap();

        // The caller's value stays in the options; the default is delivered
        // separately and must not override it on merge.
        let call = &dispatcher.calls()[0];
        assert_eq!(
            call.options.query_parameters()["forwardToReplicas"],
            json!(false)
        );
        let merged = call.options.apply_defaults(&call.defaults);
        assert_eq!(merged.query_parameters()["forwardToReplicas"], json!(false));
    }

    #[tokio::test]
    async fn test_save_synonyms_single_unchunked_write() {
        let dispatcher = MockDispatcher::new();
        let index = test_index_with_config(dispatcher.clone(), SearchConfig::with_batch_size(1));

        let synonyms: Vec<Record> = (0..5).map(object).collect();
        index
            .save_synonyms(synonyms, RequestOptions::new())
            .await
            .unwrap();

        // One write regardless of the batch size ceiling for objects.
        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/1/indexes/products/synonyms/batch");
        assert_eq!(calls[0].body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_save_synonyms_requires_identity() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let err = index
            .save_synonyms(vec![Record::new()], RequestOptions::new())
            .await
            .unwrap_err();

        match err {
            SearchError::InvalidRecord { operation, .. } => {
                assert_eq!(operation, "save_synonyms")
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_synonyms_sets_clearing_flag() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .replace_all_synonyms(vec![object(1)], RequestOptions::new())
            .await
            .unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(
            call.options.query_parameters()["replaceExistingSynonyms"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn test_replace_all_rules_sets_clearing_flag() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .replace_all_rules(vec![object(1)], RequestOptions::new())
            .await
            .unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/1/indexes/products/rules/batch");
        assert_eq!(
            call.options.query_parameters()["clearExistingRules"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn test_get_settings_requests_version() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index.get_settings(RequestOptions::new()).await.unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.options.query_parameters()["getVersion"], json!(2));
    }

    #[tokio::test]
    async fn test_get_objects_builds_lookup_requests() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .get_objects(&["a", "b"], Some(&["name"]), RequestOptions::new())
            .await
            .unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/1/indexes/*/objects");
        assert_eq!(
            call.options.body_parameters()["requests"],
            json!([
                {"indexName": "products", "objectID": "a", "attributesToRetrieve": ["name"]},
                {"indexName": "products", "objectID": "b", "attributesToRetrieve": ["name"]},
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_by_encodes_params() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let mut args = Map::new();
        args.insert("filters".to_string(), json!("category:chair"));
        index.delete_by(args, RequestOptions::new()).await.unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/1/indexes/products/deleteByQuery");
        assert_eq!(call.body["params"], json!("filters=category%3Achair"));
    }

    #[tokio::test]
    async fn test_move_to_returns_destination_handle() {
        let dispatcher = MockDispatcher::new();
        let shadow = Index::new("products_tmp_1", dispatcher.clone(), SearchConfig::default());

        let (moved, response) = shadow
            .move_to("products", RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(moved.name(), "products");
        assert_eq!(response.index().name(), "products");

        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/1/indexes/products_tmp_1/operation");
        assert_eq!(
            call.body,
            json!({"operation": "move", "destination": "products"})
        );
    }

    #[tokio::test]
    async fn test_copy_to_scoped() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index
            .copy_to("staging", Some(&CopyScope::ALL), RequestOptions::new())
            .await
            .unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(
            call.body,
            json!({
                "operation": "copy",
                "destination": "staging",
                "scope": ["settings", "synonyms", "rules"],
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_task_polls_until_published() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        dispatcher.queue_read(json!({"status": "notPublished"}));
        dispatcher.queue_read(json!({"status": "notPublished"}));
        dispatcher.queue_read(json!({"status": "published"}));

        index.wait_task("42").await.unwrap();

        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|call| call.path == "/1/indexes/products/task/42"));
    }

    #[tokio::test]
    async fn test_wait_task_empty_id_rejected() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        let err = index.wait_task("").await.unwrap_err();

        assert!(matches!(err, SearchError::InvalidArgument(_)));
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_task_attempt_cap_is_opt_in() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        dispatcher.queue_read(json!({"status": "notPublished"}));
        dispatcher.queue_read(json!({"status": "notPublished"}));

        let err = index
            .wait_task_with_options(
                "42",
                RequestOptions::new(),
                &WaitTaskOptions::with_max_attempts(2),
            )
            .await
            .unwrap_err();

        match err {
            SearchError::WaitExhausted { task_id, attempts } => {
                assert_eq!(task_id, "42");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected WaitExhausted, got {:?}", other),
        }
        assert_eq!(dispatcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_posts_empty_body() {
        let dispatcher = MockDispatcher::new();
        let index = test_index(dispatcher.clone());

        index.clear(RequestOptions::new()).await.unwrap();

        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/1/indexes/products/clear");
        assert_eq!(call.body, json!({}));
    }
}
