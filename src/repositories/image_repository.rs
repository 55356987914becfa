use super::RepoResult;
use crate::models::{Image, LinkedImage};
use sqlx::PgPool;
use std::collections::HashMap;

/// Repository for images and their event/product pivots
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, link: &str) -> RepoResult<Image> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (link)
            VALUES ($1)
            RETURNING id, link, created_at, updated_at
            "#,
        )
        .bind(link)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Image>> {
        let image = sqlx::query_as::<_, Image>(
            "SELECT id, link, created_at, updated_at FROM images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    pub async fn attach_to_event(&self, image_id: i32, event_id: i32) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO image_event (image_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (image_id, event_id) DO NOTHING
            "#,
        )
        .bind(image_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Images of each event, keyed by event id
    pub async fn find_for_events(&self, event_ids: &[i32]) -> RepoResult<HashMap<i32, Vec<Image>>> {
        self.find_linked(
            r#"
            SELECT ie.event_id AS owner_id, i.id, i.link, i.created_at, i.updated_at
            FROM images i
            JOIN image_event ie ON ie.image_id = i.id
            WHERE ie.event_id = ANY($1)
            ORDER BY ie.id
            "#,
            event_ids,
        )
        .await
    }

    /// Images of each product, keyed by product id
    pub async fn find_for_products(
        &self,
        product_ids: &[i32],
    ) -> RepoResult<HashMap<i32, Vec<Image>>> {
        self.find_linked(
            r#"
            SELECT ip.product_id AS owner_id, i.id, i.link, i.created_at, i.updated_at
            FROM images i
            JOIN image_product ip ON ip.image_id = i.id
            WHERE ip.product_id = ANY($1)
            ORDER BY ip.id
            "#,
            product_ids,
        )
        .await
    }

    async fn find_linked(&self, sql: &str, owner_ids: &[i32]) -> RepoResult<HashMap<i32, Vec<Image>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LinkedImage>(sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<i32, Vec<Image>> = HashMap::new();
        for row in rows {
            grouped.entry(row.owner_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}
