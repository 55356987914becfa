use super::RepoResult;
use crate::models::{NewUser, User, UserChanges, UserSummary};
use sqlx::{PgConnection, PgPool};

const USER_COLUMNS: &str = "id, is_verified, email, password, username, firstname, lastname, \
                            birthdate, fidelity_point, image_id, created_at, updated_at";

/// Repository for user data access
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    pub async fn create(&self, user: &NewUser) -> RepoResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password, username, firstname, lastname, birthdate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.birthdate)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Self::find_by_email_in(&mut *self.pool.acquire().await?, email).await
    }

    /// Same as [`find_by_email`](Self::find_by_email) on an open connection or transaction
    pub async fn find_by_email_in(conn: &mut PgConnection, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// Find a user by id on an open connection or transaction
    pub async fn find_by_id_in(conn: &mut PgConnection, id: i32) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// Public projections for a set of users
    pub async fn find_summaries(&self, ids: &[i32]) -> RepoResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, email, firstname, lastname, fidelity_point
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Apply a partial update. Returns `None` when the user does not exist.
    pub async fn update(&self, id: i32, changes: &UserChanges) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_verified = COALESCE($2, is_verified),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                username = COALESCE($5, username),
                firstname = COALESCE($6, firstname),
                lastname = COALESCE($7, lastname),
                fidelity_point = COALESCE($8, fidelity_point),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.is_verified)
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.username.as_deref())
        .bind(changes.firstname.as_deref())
        .bind(changes.lastname.as_deref())
        .bind(changes.fidelity_point)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Point the user's profile picture at an image row
    pub async fn set_image(&self, id: i32, image_id: i32) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET image_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Credit loyalty points, typically when a ticket is scanned at the door
    pub async fn add_fidelity_points(&self, id: i32, points: i32) -> RepoResult<()> {
        Self::add_fidelity_points_in(&mut *self.pool.acquire().await?, id, points).await
    }

    pub async fn add_fidelity_points_in(conn: &mut PgConnection, id: i32, points: i32) -> RepoResult<()> {
        sqlx::query(
            "UPDATE users SET fidelity_point = fidelity_point + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(points)
        .execute(conn)
        .await?;

        Ok(())
    }
}
