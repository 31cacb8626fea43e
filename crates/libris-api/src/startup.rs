//! Catalog construction before the listener binds.

use std::sync::Arc;

use tracing::info;

use libris_core::{CatalogStore, MemoryCatalog};
use libris_db::{log_pool_metrics, seed_if_empty, Database, PoolConfig, SeedOutcome};

use crate::config::{AppConfig, CatalogBackend};
use crate::ConfigError;

/// Build the configured catalog store.
///
/// In-memory: a missing or invalid seed file is logged and the catalog starts
/// empty. PostgreSQL: migrations (when enabled) and first-run seeding must
/// succeed or startup fails.
pub async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogStore>> {
    match config.backend {
        CatalogBackend::Memory => {
            let catalog = MemoryCatalog::load_or_empty(&config.seed_file).await;
            Ok(Arc::new(catalog))
        }
        CatalogBackend::Postgres => {
            let db = connect(config).await?;
            if config.run_migrations {
                db.migrate().await?;
                info!(subsystem = "db", op = "migrate", "Database migrations applied");
            }

            match seed_if_empty(&db, &config.seed_file).await? {
                SeedOutcome::Seeded { inserted } => info!(
                    subsystem = "db",
                    op = "seed",
                    inserted,
                    "Seeded empty catalog from {}",
                    config.seed_file.display()
                ),
                SeedOutcome::Skipped { existing } => info!(
                    subsystem = "db",
                    op = "seed",
                    existing,
                    "Catalog already populated"
                ),
            }
            log_pool_metrics(db.pool());
            Ok(Arc::new(db.items))
        }
    }
}

/// Connect to PostgreSQL with the configured pool size.
pub async fn connect(config: &AppConfig) -> anyhow::Result<Database> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(ConfigError::MissingDatabaseUrl)?;
    let pool_config = PoolConfig::new().max_connections(config.db_max_connections);
    Ok(Database::connect_with_config(url, pool_config).await?)
}
