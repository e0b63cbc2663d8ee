//! # Search Client Shared
//!
//! This crate defines the wire-level data structures shared across the search
//! client: opaque records, batch operation entries, browse pages, and the
//! payload helpers for write acknowledgements and task status.

pub mod types;

pub use types::batch::{BatchAction, BatchEntry, BatchRequest};
pub use types::browse::BrowsePage;
pub use types::record::{has_object_id, object_id, Record, OBJECT_ID_FIELD};
pub use types::task::{is_published, task_status, WriteResponse, TASK_PUBLISHED};
