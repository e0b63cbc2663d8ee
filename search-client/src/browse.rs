//! Browse iterators.
//!
//! Paginated enumeration of an index's records, synonyms, or rules as a
//! restartable, finite, lazy sequence. All three resource kinds share one
//! cursor-advance contract: each page carries the records plus an opaque
//! continuation cursor, absent on the final page. The cursor encoding is
//! owned by the provider.

use std::collections::VecDeque;

use tracing::debug;

use crate::errors::SearchError;
use crate::index::Index;
use crate::interfaces::HttpMethod;
use crate::paths;
use crate::request_options::RequestOptions;
use search_client_shared::{BrowsePage, Record};

/// The resource kind an iterator enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseKind {
    Objects,
    Synonyms,
    Rules,
}

impl BrowseKind {
    fn path_suffix(&self) -> &'static str {
        match self {
            BrowseKind::Objects => "/browse",
            BrowseKind::Synonyms => "/synonyms/search",
            BrowseKind::Rules => "/rules/search",
        }
    }
}

/// Lazy enumeration of one resource kind of one index.
///
/// Pages are fetched on demand as the buffered records drain; nothing is
/// requested until the first [`next`](BrowseIterator::next) call.
pub struct BrowseIterator {
    index: Index,
    kind: BrowseKind,
    options: RequestOptions,
    cursor: Option<String>,
    buffer: VecDeque<Record>,
    started: bool,
    finished: bool,
}

impl BrowseIterator {
    pub(crate) fn new(index: Index, kind: BrowseKind, options: RequestOptions) -> Self {
        Self {
            index,
            kind,
            options,
            cursor: None,
            buffer: VecDeque::new(),
            started: false,
            finished: false,
        }
    }

    /// The next record, fetching further pages as needed. `Ok(None)` once the
    /// sequence is exhausted.
    pub async fn next(&mut self) -> Result<Option<Record>, SearchError> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            if self.finished {
                return Ok(None);
            }
            if self.started && self.cursor.is_none() {
                self.finished = true;
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// Drain the remaining sequence into a vector.
    pub async fn collect_all(&mut self) -> Result<Vec<Record>, SearchError> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Reset to the beginning of the sequence. The next call fetches the
    /// first page again.
    pub fn restart(&mut self) {
        self.cursor = None;
        self.buffer.clear();
        self.started = false;
        self.finished = false;
    }

    async fn fetch_page(&mut self) -> Result<(), SearchError> {
        let mut options = self.options.clone();
        if let Some(cursor) = &self.cursor {
            options.set_body_parameter("cursor", cursor.clone());
        }

        let path = paths::index_path(self.index.name(), self.kind.path_suffix());
        let raw = self
            .index
            .dispatcher()
            .read(HttpMethod::Post, &path, &options)
            .await?;

        let page: BrowsePage =
            serde_json::from_value(raw).map_err(|e| SearchError::parse(e.to_string()))?;

        debug!(
            index = %self.index.name(),
            kind = ?self.kind,
            hits = page.hits.len(),
            has_cursor = page.cursor.is_some(),
            "Fetched browse page"
        );

        self.started = true;
        self.cursor = page.cursor;
        if page.hits.is_empty() && self.cursor.is_none() {
            self.finished = true;
        }
        self.buffer.extend(page.hits);
        Ok(())
    }
}
