use super::RepoResult;
use crate::models::{Product, ProductChanges, ProductInput};
use sqlx::{PgConnection, PgPool};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, created_at, updated_at";

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> RepoResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> RepoResult<Vec<Product>> {
        Self::find_by_ids_in(&mut *self.pool.acquire().await?, ids).await
    }

    pub async fn find_by_ids_in(conn: &mut PgConnection, ids: &[i32]) -> RepoResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(conn)
        .await?;

        Ok(products)
    }

    pub async fn create(&self, input: &ProductInput) -> RepoResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn update(&self, id: i32, changes: &ProductChanges) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.price)
        .bind(changes.category.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
