//! This module defines the core wire types used across the search client.
//! It re-exports the record helpers and batch operation types.

pub mod batch;
pub mod browse;
pub mod record;
pub mod task;

pub use batch::{BatchAction, BatchEntry, BatchRequest};
pub use browse::BrowsePage;
pub use record::{has_object_id, object_id, Record, OBJECT_ID_FIELD};
pub use task::{is_published, task_status, WriteResponse, TASK_PUBLISHED};
