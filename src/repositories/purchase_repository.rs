use super::RepoResult;
use crate::models::{Purchase, TicketStatus};
use sqlx::{PgConnection, PgPool};

const PURCHASE_COLUMNS: &str = "id, ticket_id, status_id, product_id, created_at, updated_at";

pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    pub async fn find_by_tickets(&self, ticket_ids: &[i32]) -> RepoResult<Vec<Purchase>> {
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }

        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE ticket_id = ANY($1) ORDER BY id"
        ))
        .bind(ticket_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Insert `units` Waiting purchases of one product on an open transaction,
    /// in a single statement. Returns the number of rows written.
    pub async fn insert_units(
        conn: &mut PgConnection,
        ticket_id: i32,
        product_id: i32,
        units: u32,
    ) -> RepoResult<u64> {
        if units == 0 {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO purchases (ticket_id, product_id, status_id)
            SELECT $1, $2, $3 FROM generate_series(1, $4)
            "#,
        )
        .bind(ticket_id)
        .bind(product_id)
        .bind(TicketStatus::Waiting.id())
        .bind(units as i32)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_status(&self, id: i32, status_id: i32) -> RepoResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            UPDATE purchases
            SET status_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }
}
