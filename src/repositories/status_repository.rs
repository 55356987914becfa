use super::RepoResult;
use crate::models::{Status, TicketStatus};
use sqlx::PgPool;

pub struct StatusRepository {
    pool: PgPool,
}

impl StatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> RepoResult<Vec<Status>> {
        let statuses = sqlx::query_as::<_, Status>(
            "SELECT id, name, created_at, updated_at FROM statuses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    /// Resolve the row backing a status by its name
    pub async fn find_by_name(&self, status: TicketStatus) -> RepoResult<Option<Status>> {
        let row = sqlx::query_as::<_, Status>(
            "SELECT id, name, created_at, updated_at FROM statuses WHERE name = $1",
        )
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
