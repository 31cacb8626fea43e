//! Topic repository implementation.

use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use libris_core::{Result, TopicSummary};

/// PostgreSQL access to topics and item-topic links.
#[derive(Clone)]
pub struct PgTopicRepository {
    pool: Pool<Postgres>,
}

impl PgTopicRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get or create a topic by name, returning its id.
    pub async fn ensure_tx(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO topics (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Associate an item row with a topic. Linking twice is a no-op.
    pub async fn link_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: i32,
        topic_id: i32,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO item_topics (item_id, topic_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(item_id)
        .bind(topic_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// All topics with their item counts, by name.
    pub async fn list(&self) -> Result<Vec<TopicSummary>> {
        let rows = sqlx::query(
            "SELECT t.name, COUNT(it.item_id) AS item_count
             FROM topics t
             LEFT JOIN item_topics it ON it.topic_id = t.id
             GROUP BY t.id, t.name
             ORDER BY t.name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<TopicSummary> {
                Ok(TopicSummary {
                    name: row.try_get("name")?,
                    item_count: row.try_get("item_count")?,
                })
            })
            .collect()
    }

    /// Topic names attached to the item with the given identity.
    pub async fn get_for_item(&self, item: Uuid) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            "SELECT t.name
             FROM topics t
             JOIN item_topics it ON it.topic_id = t.id
             JOIN items i ON i.id = it.item_id
             WHERE i.uuid = $1
             ORDER BY t.name",
        )
        .bind(item)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}
