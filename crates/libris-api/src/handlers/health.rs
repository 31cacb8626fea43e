//! Health check handler.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "memory" or "postgres"
    pub backend: String,
    pub items_count: i64,
}

/// Report service health, the active backend and the catalog size.
///
/// An empty in-memory catalog (seed file missing at startup) is still
/// healthy; the count of 0 is how operators notice it.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let items_count = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.store.backend_name().to_string(),
        items_count,
    }))
}
