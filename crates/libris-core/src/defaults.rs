//! Centralized default constants for libris.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// First page number (pages are 1-based).
pub const FIRST_PAGE: i64 = 1;

/// Default page size for list endpoints.
pub const PAGE_SIZE: i64 = 20;

/// Upper bound for any page size or store-level limit.
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// INGESTION
// =============================================================================

/// Default seed file path, relative to the working directory.
pub const SEED_FILE: &str = "data.json";

/// Maximum length of a topic name.
pub const TOPIC_NAME_MAX_LEN: usize = 100;

/// Placeholder rendered when an item has no creation timestamp.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display pattern for creation timestamps.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";
