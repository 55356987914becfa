use super::RepoResult;
use crate::models::AccessToken;
use chrono::NaiveDateTime;
use sqlx::PgPool;

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, name, last_used_at, expires_at, created_at";

/// Repository for bearer tokens, addressed by their SHA-256 digest
pub struct AccessTokenRepository {
    pool: PgPool,
}

impl AccessTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i32,
        token_hash: &str,
        name: Option<&str>,
        expires_at: Option<NaiveDateTime>,
    ) -> RepoResult<AccessToken> {
        let token = sqlx::query_as::<_, AccessToken>(&format!(
            r#"
            INSERT INTO auth_access_tokens (user_id, token_hash, name, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(token_hash)
        .bind(name)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    /// Find a token by digest, ignoring tokens that expired before `now`
    pub async fn find_valid_by_hash(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> RepoResult<Option<AccessToken>> {
        let token = sqlx::query_as::<_, AccessToken>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM auth_access_tokens
            WHERE token_hash = $1 AND (expires_at IS NULL OR expires_at > $2)
            "#
        ))
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    pub async fn touch(&self, id: i32, now: NaiveDateTime) -> RepoResult<()> {
        sqlx::query("UPDATE auth_access_tokens SET last_used_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_by_hash(&self, token_hash: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM auth_access_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
