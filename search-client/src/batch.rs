//! Batch assembly.
//!
//! Pure transforms that turn record sequences into provider batch entries and
//! split them into dispatch-sized chunks. Dispatch itself happens in the
//! calling component; everything here is side-effect free.

use search_client_shared::{has_object_id, BatchAction, BatchEntry, Record};

use crate::errors::SearchError;

/// Validate that every record carries a non-empty identity, failing fast
/// before any dispatch. `operation` names the caller for the error message.
pub fn ensure_object_ids(records: &[Record], operation: &str) -> Result<(), SearchError> {
    for (position, record) in records.iter().enumerate() {
        if !has_object_id(record) {
            return Err(SearchError::invalid_record(
                operation,
                format!(
                    "record at position {} has no objectID; every record must carry a unique objectID",
                    position
                ),
            ));
        }
    }
    Ok(())
}

/// Pair every record with an action, preserving input order.
pub fn build_entries(records: Vec<Record>, action: BatchAction) -> Vec<BatchEntry> {
    records
        .into_iter()
        .map(|record| BatchEntry::new(action, record))
        .collect()
}

/// Split entries into chunks of at most `batch_size`, preserving order.
///
/// Concatenating the chunks reproduces the input; the last chunk may be
/// smaller. Empty input yields zero chunks.
pub fn chunks(entries: Vec<BatchEntry>, batch_size: usize) -> Vec<Vec<BatchEntry>> {
    // A zero ceiling would never terminate; the smallest meaningful chunk is 1.
    let batch_size = batch_size.max(1);

    let mut chunks = Vec::with_capacity(entries.len().div_ceil(batch_size));
    let mut entries = entries.into_iter();
    loop {
        let chunk: Vec<BatchEntry> = entries.by_ref().take(batch_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    chunks
}

/// Assemble records into dispatch-ready chunks: validate identities when the
/// action requires them, build entries, and split by the configured ceiling.
pub fn assemble(
    records: Vec<Record>,
    action: BatchAction,
    batch_size: usize,
    operation: &str,
) -> Result<Vec<Vec<BatchEntry>>, SearchError> {
    if action.requires_object_id() {
        ensure_object_ids(&records, operation)?;
    }
    Ok(chunks(build_entries(records, action), batch_size))
}
