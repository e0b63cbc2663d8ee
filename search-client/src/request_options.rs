//! Per-request options.
//!
//! One typed container for the parameters a caller may attach to a request:
//! body parameters merged into the payload, and query parameters appended to
//! the URL. Replaces the need for callers to pass loose maps.

use serde_json::{Map, Value};

/// Body and query parameters for a single request.
///
/// Built with the `with_*` setters:
///
/// ```
/// use search_client::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_body_parameter("query", "tables")
///     .with_query_parameter("forwardToReplicas", true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    body: Map<String, Value>,
    query: Map<String, Value>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter to be merged into the request body.
    pub fn with_body_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Set a parameter to be appended to the request's query string.
    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set a body parameter in place.
    pub fn set_body_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(key.into(), value.into());
    }

    /// Set a query parameter in place.
    pub fn set_query_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.query.insert(key.into(), value.into());
    }

    /// Body parameters, in insertion-independent map order.
    pub fn body_parameters(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Query parameters.
    pub fn query_parameters(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Whether a query parameter is already set.
    pub fn has_query_parameter(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    /// Whether a body parameter is already set.
    pub fn has_body_parameter(&self, key: &str) -> bool {
        self.body.contains_key(key)
    }

    /// Whether no parameters are set at all.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.query.is_empty()
    }

    /// Merge in defaults, keeping every value the caller already set.
    ///
    /// Dispatcher implementations use this to honor the `defaults` argument
    /// of a write: a default is applied only for keys absent from these
    /// options.
    pub fn apply_defaults(&self, defaults: &RequestOptions) -> RequestOptions {
        let mut merged = self.clone();
        for (key, value) in &defaults.body {
            merged.body.entry(key.clone()).or_insert_with(|| value.clone());
        }
        for (key, value) in &defaults.query {
            merged.query.entry(key.clone()).or_insert_with(|| value.clone());
        }
        merged
    }
}
