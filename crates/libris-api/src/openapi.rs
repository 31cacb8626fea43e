//! Generated OpenAPI document, served at `/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use libris_core::{ItemDetail, ItemSummary, ItemType, ListItemsResponse, TopicSummary};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        description = "Read-only catalog of books, bookmarks and notes"
    ),
    paths(
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::list_topics,
        handlers::health::health_check,
    ),
    components(schemas(
        ItemType,
        ItemSummary,
        ItemDetail,
        ListItemsResponse,
        TopicSummary,
        handlers::HealthResponse,
    )),
    tags(
        (name = "Items", description = "Title-ordered catalog items"),
        (name = "Topics", description = "Item topics"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
