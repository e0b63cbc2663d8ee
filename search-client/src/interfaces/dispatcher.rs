//! Request dispatcher trait definition.
//!
//! This module defines the abstract interface for the transport layer,
//! allowing different implementations (HTTP with host failover, mock, etc.).
//! The client never builds connections itself; a dispatcher is injected
//! explicitly at construction time.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::request_options::RequestOptions;
use search_client_shared::WriteResponse;

/// HTTP method of a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The method's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Abstracts the transport layer of the search service.
///
/// Implementations own connection handling, host selection and failover,
/// request signing, and JSON encoding. The client composes paths and payloads
/// and interprets acknowledgements; everything in between is the
/// dispatcher's.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; the client shares one
/// dispatcher across index handles via `Arc`.
///
/// # Error Handling
///
/// Dispatch failures are surfaced as [`SearchError::RemoteFailure`]
/// (or [`SearchError::ParseError`] for undecodable payloads) and are
/// propagated by the client unchanged. Retries, if any, belong to the
/// dispatcher.
#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    /// Execute an idempotent fetch (search, get-by-id, get-task-status).
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method to use
    /// * `path` - The already-encoded request path
    /// * `options` - Body and query parameters to attach to the request
    async fn read(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Value, SearchError>;

    /// Execute a mutating call and return its acknowledgement.
    ///
    /// `defaults` carries parameters the client injects on the caller's
    /// behalf (currently replica forwarding). A default must be applied only
    /// for keys the caller did not already set in `options`;
    /// [`RequestOptions::apply_defaults`] implements that merge.
    ///
    /// Every acknowledgement exposes the server-issued task identifier plus
    /// the raw provider payload.
    async fn write(
        &self,
        method: HttpMethod,
        path: &str,
        body: Value,
        options: &RequestOptions,
        defaults: &RequestOptions,
    ) -> Result<WriteResponse, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_wire_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
