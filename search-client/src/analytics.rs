//! A/B test management client.
//!
//! The analytics plane shares the dispatcher contract with the data plane but
//! lives on its own host; callers inject a dispatcher configured for it.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::SearchError;
use crate::interfaces::{HttpMethod, RequestDispatcher};
use crate::paths;
use crate::request_options::RequestOptions;
use search_client_shared::WriteResponse;

/// Client for the A/B testing endpoints.
pub struct AnalyticsClient {
    dispatcher: Arc<dyn RequestDispatcher>,
}

impl AnalyticsClient {
    /// Create a client over a dispatcher configured for the analytics host.
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    fn ensure_ab_test_id(ab_test_id: &str) -> Result<(), SearchError> {
        if ab_test_id.is_empty() {
            return Err(SearchError::invalid_argument("abTestID cannot be empty"));
        }
        Ok(())
    }

    /// List A/B tests. Pagination defaults to the first ten entries unless
    /// the caller sets `offset`/`limit` explicitly.
    pub async fn get_ab_tests(&self, options: RequestOptions) -> Result<Value, SearchError> {
        let mut options = options;
        if !options.has_query_parameter("offset") {
            options.set_query_parameter("offset", 0);
        }
        if !options.has_query_parameter("limit") {
            options.set_query_parameter("limit", 10);
        }
        self.dispatcher
            .read(HttpMethod::Get, "/2/abtests", &options)
            .await
    }

    /// Fetch one A/B test.
    pub async fn get_ab_test(&self, ab_test_id: &str) -> Result<Value, SearchError> {
        Self::ensure_ab_test_id(ab_test_id)?;
        self.dispatcher
            .read(
                HttpMethod::Get,
                &format!("/2/abtests/{}", paths::encode(ab_test_id)),
                &RequestOptions::new(),
            )
            .await
    }

    /// Create an A/B test.
    pub async fn add_ab_test(&self, ab_test: Value) -> Result<WriteResponse, SearchError> {
        self.dispatcher
            .write(
                HttpMethod::Post,
                "/2/abtests",
                ab_test,
                &RequestOptions::new(),
                &RequestOptions::new(),
            )
            .await
    }

    /// Stop a running A/B test.
    pub async fn stop_ab_test(&self, ab_test_id: &str) -> Result<WriteResponse, SearchError> {
        Self::ensure_ab_test_id(ab_test_id)?;
        self.dispatcher
            .write(
                HttpMethod::Post,
                &format!("/2/abtests/{}", paths::encode(ab_test_id)),
                json!({}),
                &RequestOptions::new(),
                &RequestOptions::new(),
            )
            .await
    }

    /// Delete an A/B test.
    pub async fn delete_ab_test(&self, ab_test_id: &str) -> Result<WriteResponse, SearchError> {
        Self::ensure_ab_test_id(ab_test_id)?;
        self.dispatcher
            .write(
                HttpMethod::Delete,
                &format!("/2/abtests/{}", paths::encode(ab_test_id)),
                json!({}),
                &RequestOptions::new(),
                &RequestOptions::new(),
            )
            .await
    }
}
