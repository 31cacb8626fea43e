//! Core traits for libris abstractions.
//!
//! Both catalog backends implement [`CatalogStore`], so the HTTP layer holds
//! an `Arc<dyn CatalogStore>` and never knows which one it talks to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CatalogItem, TopicSummary};

/// Read access to a title-ordered catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Up to `limit` items after the first `skip`, in title order.
    ///
    /// `limit` is clamped to 1..=100. A `skip` past the end yields an empty
    /// vector, never an error.
    async fn list_page(&self, skip: i64, limit: i64) -> Result<Vec<CatalogItem>>;

    /// Look up an item by its immutable identity.
    async fn get_by_identity(&self, id: Uuid) -> Result<Option<CatalogItem>>;

    /// Number of items in the catalog.
    async fn count(&self) -> Result<i64>;

    /// All topics with their item counts, ordered by name.
    async fn list_topics(&self) -> Result<Vec<TopicSummary>>;

    /// Short backend name for health reporting ("memory", "postgres").
    fn backend_name(&self) -> &'static str;
}
