use super::RepoResult;
use crate::models::Message;
use sqlx::PgPool;

const MESSAGE_COLUMNS: &str = "id, subject, body, user_id, created_at, updated_at";

pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i32, subject: &str, body: &str) -> RepoResult<Message> {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (subject, body, user_id)
            VALUES ($1, $2, $3)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(subject)
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Messages written by a user, newest first
    pub async fn find_by_user(&self, user_id: i32) -> RepoResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
