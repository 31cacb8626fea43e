//! Server configuration from the environment.
//!
//! `main` loads `.env` with dotenvy first, so values there behave exactly like
//! exported variables.
//!
//! | Variable             | Default      |
//! |----------------------|--------------|
//! | `CATALOG_BACKEND`    | `memory`     |
//! | `DATABASE_URL`       | required for `postgres` |
//! | `SEED_FILE`          | `data.json`  |
//! | `HOST`               | `0.0.0.0`    |
//! | `PORT`               | `3000`       |
//! | `DB_MAX_CONNECTIONS` | `10`         |
//! | `RUN_MIGRATIONS`     | `true`       |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use libris_core::defaults::SEED_FILE;
use libris_db::pool::DEFAULT_MAX_CONNECTIONS;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors, reported before anything is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("DATABASE_URL must be set when CATALOG_BACKEND=postgres")]
    MissingDatabaseUrl,
}

/// Which catalog backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogBackend {
    /// Seed file loaded into process memory at startup.
    #[default]
    Memory,
    /// PostgreSQL, seeded once when empty.
    Postgres,
}

impl CatalogBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogBackend::Memory => "memory",
            CatalogBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for CatalogBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(CatalogBackend::Memory),
            "postgres" | "postgresql" => Ok(CatalogBackend::Postgres),
            _ => Err(format!("expected memory or postgres, got {}", s)),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: CatalogBackend,
    pub database_url: Option<String>,
    pub seed_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub run_migrations: bool,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = parse_or(
            get("CATALOG_BACKEND"),
            "CATALOG_BACKEND",
            CatalogBackend::default(),
        )?;
        let database_url = get("DATABASE_URL");
        if backend == CatalogBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            backend,
            database_url,
            seed_file: get("SEED_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(SEED_FILE)),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            db_max_connections: parse_or(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            run_migrations: parse_bool(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            key: "HOST",
            value: self.host.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn parse_bool(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            value: raw.unwrap_or_default(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load_config(&[]).unwrap();

        assert_eq!(config.backend, CatalogBackend::Memory);
        assert_eq!(config.seed_file, PathBuf::from("data.json"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 10);
        assert!(config.run_migrations);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(
            load_config(&[("CATALOG_BACKEND", "postgres")]),
            Err(ConfigError::MissingDatabaseUrl)
        );

        let config = load_config(&[
            ("CATALOG_BACKEND", "PostgreSQL"),
            ("DATABASE_URL", "postgres://localhost/libris"),
            ("RUN_MIGRATIONS", "no"),
        ])
        .unwrap();
        assert_eq!(config.backend, CatalogBackend::Postgres);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load_config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(matches!(
            load_config(&[("CATALOG_BACKEND", "sqlite")]),
            Err(ConfigError::InvalidValue {
                key: "CATALOG_BACKEND",
                ..
            })
        ));
        assert!(matches!(
            load_config(&[("RUN_MIGRATIONS", "maybe")]),
            Err(ConfigError::InvalidValue {
                key: "RUN_MIGRATIONS",
                ..
            })
        ));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load_config(&[("PORT", " "), ("SEED_FILE", "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.seed_file, PathBuf::from("data.json"));
    }

    #[test]
    fn test_bind_addr() {
        let config = load_config(&[("HOST", "127.0.0.1"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");

        let config = load_config(&[("HOST", "not a host")]).unwrap();
        assert!(config.bind_addr().is_err());
    }
}
