use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Stored bearer token. Only the SHA-256 digest of the token is persisted.
#[derive(Debug, Clone, FromRow)]
pub struct AccessToken {
    pub id: i32,
    pub user_id: i32,
    pub token_hash: String,
    pub name: Option<String>,
    pub last_used_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl AccessToken {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.map_or(false, |expires_at| expires_at <= now)
    }
}
