//! In-memory catalog backend.
//!
//! The catalog is built once during startup from a seed file and is read-only
//! afterwards: handlers share it through an `Arc` and no method takes
//! `&mut self`, so no locking is involved. It is dropped at process shutdown.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::Result;
use crate::ingest::{assign_sequence_numbers, ingest_file, sort_items, ValidationMode};
use crate::models::{CatalogItem, TopicSummary};
use crate::pagination::{clamp_limit, clamp_skip};
use crate::traits::CatalogStore;

/// Title-ordered catalog held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: Vec<CatalogItem>,
    by_id: HashMap<Uuid, usize>,
}

impl MemoryCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from one ingestion batch.
    ///
    /// The batch is re-sorted and renumbered so the ordering invariant holds
    /// regardless of how the caller produced it.
    pub fn from_batch(mut items: Vec<CatalogItem>) -> Self {
        sort_items(&mut items);
        assign_sequence_numbers(&mut items);
        let by_id = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id, position))
            .collect();
        Self { items, by_id }
    }

    /// Load a catalog from a seed file, propagating any failure.
    pub async fn load(path: &Path) -> Result<Self> {
        let items = ingest_file(path, ValidationMode::Lenient).await?;
        Ok(Self::from_batch(items))
    }

    /// Load a catalog from a seed file, falling back to an empty catalog.
    ///
    /// An unreadable or invalid seed file must not keep the service from
    /// starting; the failure is logged at ERROR and the catalog starts empty.
    pub async fn load_or_empty(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(catalog) => {
                info!(
                    subsystem = "catalog",
                    component = "memory",
                    op = "load",
                    seed_path = %path.display(),
                    record_count = catalog.len(),
                    "In-memory catalog loaded"
                );
                catalog
            }
            Err(e) => {
                error!(
                    subsystem = "catalog",
                    component = "memory",
                    op = "load",
                    seed_path = %path.display(),
                    error = %e,
                    "CRITICAL: could not load seed data, serving an empty catalog"
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in title order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_page(&self, skip: i64, limit: i64) -> Result<Vec<CatalogItem>> {
        let skip = usize::try_from(clamp_skip(skip)).unwrap_or(usize::MAX);
        let limit = clamp_limit(limit) as usize;
        Ok(self.items.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn get_by_identity(&self, id: Uuid) -> Result<Option<CatalogItem>> {
        Ok(self
            .by_id
            .get(&id)
            .and_then(|&position| self.items.get(position))
            .cloned())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.items.len() as i64)
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>> {
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for item in &self.items {
            for topic in &item.topics {
                *counts.entry(topic.as_str()).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(name, item_count)| TopicSummary {
                name: name.to_string(),
                item_count,
            })
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
