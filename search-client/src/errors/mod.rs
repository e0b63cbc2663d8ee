//! Error types for the search client.

pub mod search_error;

pub use search_error::SearchError;
