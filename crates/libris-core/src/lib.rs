//! # libris-core
//!
//! Core types, traits, and ingestion logic for the libris catalog.
//!
//! This crate owns everything that does not need a database: the catalog
//! record model, seed-file validation and deterministic ordering, pagination
//! rules, and the in-memory [`MemoryCatalog`] backend. The PostgreSQL backend
//! lives in `libris-db` and implements the same [`CatalogStore`] trait.

pub mod defaults;
pub mod error;
pub mod ingest;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use ingest::{
    ingest, ingest_file, read_seed_file, sort_items, sort_key, validate_record, ValidationError,
    ValidationMode, ValidationReason,
};
pub use memory::MemoryCatalog;
pub use models::*;
pub use pagination::PageRequest;
pub use traits::*;
