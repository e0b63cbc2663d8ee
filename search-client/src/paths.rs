//! Request path construction.
//!
//! All index-scoped endpoints live under `/1/indexes/{indexName}`; names and
//! resource identifiers are percent-encoded into their path segment.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Multi-index object lookup endpoint.
pub(crate) const MULTI_INDEX_OBJECTS: &str = "/1/indexes/*/objects";

/// Percent-encode a path segment.
pub(crate) fn encode(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Build an index-scoped path: `/1/indexes/{name}{suffix}`.
pub(crate) fn index_path(index_name: &str, suffix: &str) -> String {
    format!("/1/indexes/{}{}", encode(index_name), suffix)
}

/// Serialize filter arguments into a query-string payload, as the
/// delete-by-query endpoint expects in its `params` field. Non-string values
/// are carried in their JSON rendering.
pub(crate) fn build_query(params: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::String(s) => {
                serializer.append_pair(key, s);
            }
            other => {
                serializer.append_pair(key, &other.to_string());
            }
        }
    }
    serializer.finish()
}
