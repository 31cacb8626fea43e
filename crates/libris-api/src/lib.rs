//! # libris-api
//!
//! HTTP surface of the libris catalog: paged listing in title order, detail
//! by UUID, topics and health. The same router runs over either catalog
//! backend through [`AppState`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod startup;
pub mod state;
pub mod telemetry;

pub use config::{AppConfig, CatalogBackend, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
