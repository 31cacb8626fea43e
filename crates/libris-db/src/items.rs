//! Item repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use libris_core::pagination::{clamp_limit, clamp_skip};
use libris_core::{CatalogItem, CatalogStore, Error, ItemType, Result, TopicSummary};

use crate::topics::PgTopicRepository;

/// Listing order. `lower()` applies the database's case mapping; comparison
/// is by code point (`COLLATE "C"`) so it matches the in-memory sort, and the
/// surrogate `id` breaks ties in insertion order.
const TITLE_ORDER: &str = r#"lower(i.title) COLLATE "C", i.id"#;

/// Item columns plus aggregated topic names, for a row aliased `i`.
const ITEM_COLUMNS: &str = r#"
    i.uuid, i.title, i.source, i.item_type::text AS item_type, i.attributes, i.created_at,
    COALESCE(
        (SELECT array_agg(t.name ORDER BY t.name)
           FROM item_topics it JOIN topics t ON t.id = it.topic_id
          WHERE it.item_id = i.id),
        ARRAY[]::text[]
    ) AS topics
"#;

/// Map a database row to a CatalogItem.
fn map_row_to_item(row: &PgRow) -> Result<CatalogItem> {
    let item_type: String = row.try_get("item_type")?;
    let item_type = item_type
        .parse::<ItemType>()
        .map_err(|e| Error::Internal(format!("Stored item has {}", e)))?;

    Ok(CatalogItem {
        id: row.try_get("uuid")?,
        sequence_number: row.try_get("sequence_number")?,
        title: row.try_get("title")?,
        source: row.try_get("source")?,
        item_type,
        attributes: row.try_get::<Option<serde_json::Value>, _>("attributes")?,
        created_at: row.try_get::<Option<DateTime<Utc>>, _>("created_at")?,
        topics: row.try_get("topics")?,
    })
}

/// PostgreSQL implementation of CatalogStore.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: Pool<Postgres>,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Block concurrent writers to `items` until the transaction ends.
    pub async fn lock_tx(&self, tx: &mut Transaction<'_, Postgres>) -> Result<()> {
        sqlx::query("LOCK TABLE items IN EXCLUSIVE MODE")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Count items inside an open transaction.
    pub async fn count_tx(&self, tx: &mut Transaction<'_, Postgres>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&mut **tx)
            .await?;
        Ok(count)
    }

    /// Insert an ingested batch in the given order, with its topic links.
    ///
    /// Items must already be sorted: the surrogate `id` assigned here is the
    /// tie-break of the listing order.
    pub async fn insert_batch_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[CatalogItem],
    ) -> Result<usize> {
        for item in items {
            let row_id: i32 = sqlx::query_scalar(
                "INSERT INTO items (uuid, title, source, item_type, attributes)
                 VALUES ($1, $2, $3, $4::item_type, $5)
                 RETURNING id",
            )
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.source)
            .bind(item.item_type.as_str())
            .bind(&item.attributes)
            .fetch_one(&mut **tx)
            .await?;

            for topic in &item.topics {
                let topic_id = PgTopicRepository::ensure_tx(tx, topic).await?;
                PgTopicRepository::link_tx(tx, row_id, topic_id).await?;
            }
        }
        Ok(items.len())
    }

    /// Remove every item and topic and restart the identity sequences.
    pub async fn truncate_tx(&self, tx: &mut Transaction<'_, Postgres>) -> Result<()> {
        sqlx::query("TRUNCATE TABLE items, topics RESTART IDENTITY CASCADE")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Surrogate ids in listing order (used to verify identity restarts).
    pub async fn row_ids(&self) -> Result<Vec<i32>> {
        let query = format!("SELECT i.id FROM items i ORDER BY {}", TITLE_ORDER);
        let ids = sqlx::query_scalar(&query).fetch_all(&self.pool).await?;
        Ok(ids)
    }
}

#[async_trait]
impl CatalogStore for PgItemRepository {
    async fn list_page(&self, skip: i64, limit: i64) -> Result<Vec<CatalogItem>> {
        let start = Instant::now();
        let skip = clamp_skip(skip);
        let limit = clamp_limit(limit);

        // Connection is scoped to this call and returned to the pool on drop.
        let mut conn = self.pool.acquire().await?;
        // Page first, then number the page: the order is total, so the
        // sequence number is `skip` plus the position within the page.
        let query = format!(
            "SELECT {cols}, $1 + row_number() OVER (ORDER BY {order}) AS sequence_number
             FROM (SELECT * FROM items i ORDER BY {order} OFFSET $1 LIMIT $2) i
             ORDER BY {order}",
            cols = ITEM_COLUMNS,
            order = TITLE_ORDER,
        );
        let rows = sqlx::query(&query)
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        let items = rows.iter().map(map_row_to_item).collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "items",
            op = "list_page",
            skip,
            limit,
            result_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed item page"
        );
        Ok(items)
    }

    async fn get_by_identity(&self, id: Uuid) -> Result<Option<CatalogItem>> {
        let mut conn = self.pool.acquire().await?;
        // Lookup goes through the unique `uuid` index; the position is an
        // index-backed count of the rows ordered before this one.
        let query = format!(
            r#"SELECT {cols},
                   (SELECT count(*) + 1 FROM items j
                     WHERE (lower(j.title) COLLATE "C", j.id)
                         < (lower(i.title) COLLATE "C", i.id)) AS sequence_number
               FROM items i
               WHERE i.uuid = $1"#,
            cols = ITEM_COLUMNS,
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(map_row_to_item).transpose()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>> {
        PgTopicRepository::new(self.pool.clone()).list().await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
