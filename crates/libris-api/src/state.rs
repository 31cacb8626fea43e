//! Shared handler state.

use std::sync::Arc;

use libris_core::{CatalogStore, MemoryCatalog};

/// State cloned into every handler.
///
/// The store is built once during startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// State backed by an in-memory catalog.
    pub fn in_memory(catalog: MemoryCatalog) -> Self {
        Self::new(Arc::new(catalog))
    }
}
