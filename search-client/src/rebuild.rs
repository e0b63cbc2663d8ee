//! Atomic full-index rebuild.
//!
//! A rebuild replaces the entire contents of a production index — settings,
//! synonyms, rules, and records — while the old dataset stays fully queryable
//! until the instant of promotion. The new dataset is staged in a transient
//! shadow index and made visible by a single atomic move onto the production
//! name.
//!
//! The orchestration is not transactional: a failure before the move leaves
//! production untouched but may orphan the shadow index, which is never
//! deleted automatically. Callers must treat a failed rebuild as "a shadow
//! index may exist" and clean up externally.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::SearchError;
use crate::index::{CopyScope, Index};
use crate::request_options::RequestOptions;
use crate::response::IndexingResponse;
use search_client_shared::Record;

/// A full replacement dataset for one index.
///
/// Settings, synonyms, and rules are optional; resource kinds left out keep
/// the production index's current values, carried over by the rebuild's
/// copy-seed step.
#[derive(Debug, Clone, Default)]
pub struct IndexContent {
    settings: Option<Value>,
    synonyms: Option<Vec<Record>>,
    rules: Option<Vec<Record>>,
    objects: Vec<Record>,
}

impl IndexContent {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply replacement settings (full overwrite).
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Supply replacement synonyms.
    pub fn with_synonyms(mut self, synonyms: Vec<Record>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    /// Supply replacement rules.
    pub fn with_rules(mut self, rules: Vec<Record>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Supply the replacement records.
    pub fn with_objects(mut self, objects: Vec<Record>) -> Self {
        self.objects = objects;
        self
    }
}

/// Generate a unique shadow name for a production index.
fn shadow_index_name(production: &str) -> String {
    format!("{}_tmp_{}", production, Uuid::new_v4().simple())
}

impl Index {
    fn shadow(&self, shadow_name: &str) -> Index {
        Index::new(
            shadow_name,
            Arc::clone(self.dispatcher()),
            self.config().clone(),
        )
    }

    /// Seed a fresh shadow index with the production configuration.
    ///
    /// The copy is always scoped to settings, synonyms, and rules; the new
    /// dataset then overwrites only the kinds it actually supplies. When the
    /// dataset supplies all three kinds there is nothing worth seeding, so
    /// the copy is skipped.
    async fn seed_shadow(
        &self,
        shadow_name: &str,
        has_settings: bool,
        has_synonyms: bool,
        has_rules: bool,
    ) -> Result<Option<IndexingResponse>, SearchError> {
        if has_settings && has_synonyms && has_rules {
            return Ok(None);
        }

        let response = self
            .copy_to(shadow_name, Some(&CopyScope::ALL), RequestOptions::new())
            .await?;
        Ok(Some(response))
    }

    /// Replace the index's entire contents with a new dataset.
    ///
    /// Stages the dataset in a shadow index, then atomically promotes it onto
    /// this index's name. Readers of the production name see the old dataset
    /// until the move commits, then only the new one — never a mix.
    ///
    /// With `wait` set, every staged write is awaited before the move is
    /// issued, and the move itself is awaited before returning.
    ///
    /// Returns every acknowledgement produced, in dispatch order, the move's
    /// last; callers can audit or await any subset not already awaited. On
    /// failure the error of the failing step propagates as-is, remaining
    /// steps are skipped, and nothing already dispatched is undone.
    #[instrument(skip(self, content), fields(index = %self.name()))]
    pub async fn reindex(
        &self,
        content: IndexContent,
        wait: bool,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        let shadow_name = shadow_index_name(self.name());
        let shadow = self.shadow(&shadow_name);
        info!(shadow = %shadow_name, "Rebuilding index into shadow");

        let IndexContent {
            settings,
            synonyms,
            rules,
            objects,
        } = content;

        let mut responses = Vec::new();

        if let Some(seed) = self
            .seed_shadow(
                &shadow_name,
                settings.is_some(),
                synonyms.is_some(),
                rules.is_some(),
            )
            .await?
        {
            responses.push(seed);
        }

        if let Some(settings) = settings {
            responses.push(shadow.set_settings(settings, RequestOptions::new()).await?);
        }
        if let Some(synonyms) = synonyms {
            responses.push(shadow.save_synonyms(synonyms, RequestOptions::new()).await?);
        }
        if let Some(rules) = rules {
            responses.push(shadow.save_rules(rules, RequestOptions::new()).await?);
        }

        responses.extend(shadow.save_objects(objects, RequestOptions::new()).await?);

        if wait {
            for response in &responses {
                response.wait().await?;
            }
        }

        let (_promoted, move_response) = shadow.move_to(self.name(), RequestOptions::new()).await?;
        info!(index = %self.name(), "Shadow index promoted");

        if wait {
            move_response.wait().await?;
        }
        responses.push(move_response);

        Ok(responses)
    }

    /// Replace every record while preserving settings, synonyms, and rules.
    ///
    /// The simpler rebuild: the current tuning resources are copied into a
    /// shadow index verbatim, the new records are bulk-saved into it, and the
    /// shadow is atomically promoted. With `wait` set, the record saves are
    /// awaited before the move is issued; the move's acknowledgement is
    /// returned unawaited.
    #[instrument(skip(self, objects), fields(index = %self.name(), object_count = objects.len()))]
    pub async fn replace_all_objects(
        &self,
        objects: Vec<Record>,
        wait: bool,
    ) -> Result<Vec<IndexingResponse>, SearchError> {
        let shadow_name = shadow_index_name(self.name());
        let shadow = self.shadow(&shadow_name);
        info!(shadow = %shadow_name, "Replacing all objects through shadow index");

        let mut responses = Vec::new();
        responses.push(
            self.copy_to(&shadow_name, Some(&CopyScope::ALL), RequestOptions::new())
                .await?,
        );

        let save_responses = shadow.save_objects(objects, RequestOptions::new()).await?;
        if wait {
            for response in &save_responses {
                response.wait().await?;
            }
        }
        responses.extend(save_responses);

        let (_promoted, move_response) = shadow.move_to(self.name(), RequestOptions::new()).await?;
        info!(index = %self.name(), "Shadow index promoted");
        responses.push(move_response);

        Ok(responses)
    }
}
