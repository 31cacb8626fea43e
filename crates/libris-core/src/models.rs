//! Core data models for libris.
//!
//! These types are shared by both catalog backends and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::defaults::{CREATED_AT_FORMAT, NOT_AVAILABLE};

// =============================================================================
// ITEM TYPE
// =============================================================================

/// Kind of catalog item.
///
/// Stored as the `item_type` PostgreSQL enum, so the set of variants is a
/// persisted invariant: adding one requires a migration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Book,
    Bookmark,
    Note,
    #[default]
    Uncategorized,
}

impl ItemType {
    /// Every variant, in declaration order.
    pub const ALL: [ItemType; 4] = [
        ItemType::Book,
        ItemType::Bookmark,
        ItemType::Note,
        ItemType::Uncategorized,
    ];

    /// Wire and database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Bookmark => "bookmark",
            Self::Note => "note",
            Self::Uncategorized => "uncategorized",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(Self::Book),
            "bookmark" => Ok(Self::Bookmark),
            "note" => Ok(Self::Note),
            "uncategorized" => Ok(Self::Uncategorized),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

// =============================================================================
// CATALOG ITEM
// =============================================================================

/// One catalog record (book, bookmark or note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Immutable public identity, assigned once at creation.
    pub id: Uuid,
    /// 1-based position in the title order of the batch or listing that
    /// produced this value. Not an identity.
    pub sequence_number: Option<i64>,
    pub title: String,
    /// Originating artifact, e.g. a file name.
    pub source: Option<String>,
    pub item_type: ItemType,
    /// Free-form metadata such as `{"format": "pdf"}`.
    pub attributes: Option<JsonValue>,
    /// Set by the durable store on insert; absent for in-memory items.
    pub created_at: Option<DateTime<Utc>>,
    /// Topic names, sorted.
    pub topics: Vec<String>,
}

/// Summary view of an item for listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemSummary {
    pub id: Uuid,
    /// Display index within the listing.
    pub sequence_number: Option<i64>,
    pub title: String,
    pub item_type: ItemType,
}

impl From<&CatalogItem> for ItemSummary {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            sequence_number: item.sequence_number,
            title: item.title.clone(),
            item_type: item.item_type,
        }
    }
}

/// Full view of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemDetail {
    pub id: Uuid,
    pub sequence_number: Option<i64>,
    pub title: String,
    pub source: Option<String>,
    pub item_type: ItemType,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<JsonValue>,
    /// Creation time as `YYYY-MM-DD HH:MM`, or `N/A`.
    pub created_at: String,
    pub topics: Vec<String>,
}

impl From<CatalogItem> for ItemDetail {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            sequence_number: item.sequence_number,
            created_at: format_created_at(item.created_at),
            title: item.title,
            source: item.source,
            item_type: item.item_type,
            attributes: item.attributes,
            topics: item.topics,
        }
    }
}

/// Render a creation timestamp for display.
///
/// Absence renders as an explicit `N/A` marker rather than an empty string.
pub fn format_created_at(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts.format(CREATED_AT_FORMAT).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

// =============================================================================
// TOPICS
// =============================================================================

/// A topic with the number of items associated with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TopicSummary {
    pub name: String,
    pub item_count: i64,
}

// =============================================================================
// LISTING
// =============================================================================

/// One page of the title-ordered catalog.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListItemsResponse {
    pub items: Vec<ItemSummary>,
    /// Echo of the (normalized) requested page.
    pub page: i64,
    /// Echo of the (clamped) requested page size.
    pub page_size: i64,
    /// Items in the whole catalog.
    pub total: i64,
    pub has_more: bool,
}
