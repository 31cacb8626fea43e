//! Catalog item HTTP handlers.
//!
//! Listing is paged in title order; detail lookups go by the item's UUID,
//! never by listing position.

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use uuid::Uuid;

use libris_core::{ItemDetail, ItemSummary, ListItemsResponse, PageRequest, TopicSummary};

use crate::{ApiError, AppState};

/// Query parameters for listing items.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Items per page (default 20, clamped to 100)
    pub page_size: Option<i64>,
}

/// List one page of the catalog in case-insensitive title order.
///
/// The page and `total` are read in separate store calls (separate pooled
/// connections for PostgreSQL). They agree as long as the catalog is not
/// reseeded while the server is serving, which `libris-migrate reseed`
/// assumes: it is an operator action run against a quiesced service.
#[utoipa::path(get, path = "/api/v1/items", tag = "Items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Page of items", body = ListItemsResponse),
        (status = 400, description = "Invalid page or page_size"),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ListItemsResponse>, ApiError> {
    let start = Instant::now();
    let request = PageRequest::new(query.page, query.page_size)?;

    let items = state
        .store
        .list_page(request.skip(), request.limit())
        .await?;
    let total = state.store.count().await?;
    let has_more = request.skip().saturating_add(items.len() as i64) < total;

    debug!(
        subsystem = "api",
        component = "items",
        op = "list",
        page = request.page(),
        page_size = request.page_size(),
        result_count = items.len(),
        total,
        duration_ms = start.elapsed().as_millis() as u64,
        "Listed items"
    );

    Ok(Json(ListItemsResponse {
        items: items.iter().map(ItemSummary::from).collect(),
        page: request.page(),
        page_size: request.page_size(),
        total,
        has_more,
    }))
}

/// Get one item by its UUID.
#[utoipa::path(get, path = "/api/v1/items/{id}", tag = "Items",
    params(("id" = String, Path, description = "Item UUID")),
    responses(
        (status = 200, description = "Item detail", body = ItemDetail),
        (status = 400, description = "Malformed UUID"),
        (status = 404, description = "Item not found"),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemDetail>, ApiError> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid item id: {}", id)))?;

    let item = state
        .store
        .get_by_identity(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item {} not found", id)))?;

    Ok(Json(ItemDetail::from(item)))
}

/// List topics with the number of items in each.
#[utoipa::path(get, path = "/api/v1/topics", tag = "Topics",
    responses((status = 200, description = "Topics by name", body = [TopicSummary]))
)]
pub async fn list_topics(
    State(state): State<AppState>,
) -> Result<Json<Vec<TopicSummary>>, ApiError> {
    Ok(Json(state.store.list_topics().await?))
}
