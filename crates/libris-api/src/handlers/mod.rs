//! HTTP handlers for libris-api.

pub mod health;
pub mod items;

pub use health::{health_check, HealthResponse};
pub use items::{get_item, list_items, list_topics, ListItemsQuery};
