//! libris-migrate: operator tool for the PostgreSQL catalog.
//!
//! ```text
//! libris-migrate reseed --file data.json   # replace the whole catalog
//! libris-migrate seed                      # seed only if empty
//! libris-migrate status                    # print item count
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use libris_api::{startup, telemetry, AppConfig, CatalogBackend};
use libris_db::{reseed, seed_if_empty, CatalogStore, SeedOutcome};

#[derive(Parser)]
#[command(name = "libris-migrate")]
#[command(author, version, about = "Seed and reseed the libris PostgreSQL catalog")]
#[command(propagate_version = true)]
struct Cli {
    /// Skip applying pending schema migrations first
    #[arg(long, global = true)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete every item and topic, then load the seed file
    Reseed {
        /// Seed file (default: SEED_FILE or data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Load the seed file only when the catalog is empty
    Seed {
        /// Seed file (default: SEED_FILE or data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the number of items in the catalog
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = telemetry::init_tracing("libris_migrate=info,libris_db=info");

    let cli = Cli::parse();

    // This tool always talks to PostgreSQL, whatever the server is set to.
    let mut config = AppConfig::from_lookup(|key| match key {
        "CATALOG_BACKEND" => Some(CatalogBackend::Postgres.to_string()),
        _ => std::env::var(key).ok(),
    })?;
    if cli.no_migrate {
        config.run_migrations = false;
    }

    let db = startup::connect(&config)
        .await
        .context("Failed to connect to the catalog database")?;
    if config.run_migrations {
        db.migrate().await?;
    }

    match cli.command {
        Commands::Reseed { file } => {
            let path = file.unwrap_or_else(|| config.seed_file.clone());
            let inserted = reseed(&db, &path)
                .await
                .with_context(|| format!("Reseed from {} failed", path.display()))?;
            info!(inserted, "Reseed complete");
            println!("Reseeded {} items from {}", inserted, path.display());
        }
        Commands::Seed { file } => {
            let path = file.unwrap_or_else(|| config.seed_file.clone());
            match seed_if_empty(&db, &path).await? {
                SeedOutcome::Seeded { inserted } => {
                    println!("Seeded {} items from {}", inserted, path.display())
                }
                SeedOutcome::Skipped { existing } => {
                    println!("Catalog already has {} items, nothing to do", existing)
                }
            }
        }
        Commands::Status => {
            let count = db.items.count().await?;
            println!("{} items", count);
        }
    }

    Ok(())
}
