//! Loading seed files into the durable catalog.
//!
//! Both entry points read and validate the whole file before the database is
//! touched, so a missing or malformed seed file never leaves the catalog
//! half-written. Durable seeding is strict: an unknown item type rejects the
//! batch instead of downgrading it.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use libris_core::{ingest_file, CatalogStore, Result, ValidationMode};

use crate::Database;

/// Result of [`seed_if_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog was empty and `inserted` items were written.
    Seeded { inserted: usize },
    /// The catalog already held `existing` items and was left untouched.
    Skipped { existing: i64 },
}

/// Seed the catalog from `path` only when it holds no items.
pub async fn seed_if_empty(db: &Database, path: &Path) -> Result<SeedOutcome> {
    let existing = db.items.count().await?;
    if existing > 0 {
        info!(
            subsystem = "db",
            component = "seed",
            op = "seed_if_empty",
            existing,
            "Catalog already populated, skipping seed"
        );
        return Ok(SeedOutcome::Skipped { existing });
    }

    let start = Instant::now();
    let items = ingest_file(path, ValidationMode::Strict).await?;

    let mut tx = db.pool.begin().await?;
    // Re-check under the lock so two starting instances don't both seed.
    db.items.lock_tx(&mut tx).await?;
    let existing = db.items.count_tx(&mut tx).await?;
    if existing > 0 {
        tx.rollback().await?;
        return Ok(SeedOutcome::Skipped { existing });
    }
    let inserted = db.items.insert_batch_tx(&mut tx, &items).await?;
    tx.commit().await?;

    info!(
        subsystem = "db",
        component = "seed",
        op = "seed_if_empty",
        seed_path = %path.display(),
        inserted,
        duration_ms = start.elapsed().as_millis() as u64,
        "Seeded empty catalog"
    );
    Ok(SeedOutcome::Seeded { inserted })
}

/// Replace the whole catalog with the contents of `path`.
///
/// Existing items and topics are removed and identity sequences restart, all
/// in the same transaction as the inserts. Returns the number of items
/// written.
pub async fn reseed(db: &Database, path: &Path) -> Result<usize> {
    let start = Instant::now();
    let items = ingest_file(path, ValidationMode::Strict).await?;

    let mut tx = db.pool.begin().await?;
    db.items.truncate_tx(&mut tx).await?;
    let inserted = db.items.insert_batch_tx(&mut tx, &items).await?;
    tx.commit().await?;

    info!(
        subsystem = "db",
        component = "seed",
        op = "reseed",
        seed_path = %path.display(),
        inserted,
        duration_ms = start.elapsed().as_millis() as u64,
        "Catalog reseeded"
    );
    Ok(inserted)
}
