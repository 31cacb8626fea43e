//! # libris-db
//!
//! PostgreSQL backend for the libris catalog.
//!
//! This crate provides:
//! - Connection pool management
//! - A [`CatalogStore`] implementation ordered server-side by title
//! - Seeding and full reseeding from a JSON seed file
//!
//! ## Example
//!
//! ```rust,ignore
//! use libris_db::{Database, CatalogStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/libris").await?;
//!     db.migrate().await?;
//!
//!     let first_page = db.items.list_page(0, 20).await?;
//!     println!("{} items", first_page.len());
//!     Ok(())
//! }
//! ```
pub mod items;
pub mod pool;
pub mod seed;
pub mod topics;

// Always compiled so integration tests (in tests/) can use it.
pub mod test_fixtures;

// Re-export core types
pub use libris_core::*;

pub use items::PgItemRepository;
pub use pool::{
    create_pool, create_pool_with_config, log_pool_metrics, validate_schema_name, PoolConfig,
};
pub use seed::{reseed, seed_if_empty, SeedOutcome};
pub use topics::PgTopicRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Catalog items.
    pub items: PgItemRepository,
    /// Topics and item-topic links.
    pub topics: PgTopicRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            items: PgItemRepository::new(pool.clone()),
            topics: PgTopicRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with a custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
