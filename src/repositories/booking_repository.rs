use super::RepoResult;
use crate::models::{Booking, BookingChanges};
use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool};

const BOOKING_COLUMNS: &str = "id, datetime, user_id, event_id, created_at, updated_at";

/// Repository for booking data access
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All bookings, newest first
    pub async fn list(&self) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Lock a booking row until the surrounding transaction ends
    pub async fn find_for_update(conn: &mut PgConnection, id: i32) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(booking)
    }

    /// Bookings owned by a user, soonest event first
    pub async fn find_by_user(&self, user_id: i32) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY datetime ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Insert a booking on an open transaction
    pub async fn insert(
        conn: &mut PgConnection,
        datetime: NaiveDateTime,
        user_id: i32,
        event_id: i32,
    ) -> RepoResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (datetime, user_id, event_id)
            VALUES ($1, $2, $3)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(datetime)
        .bind(user_id)
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(booking)
    }

    pub async fn update(&self, id: i32, changes: &BookingChanges) -> RepoResult<Option<Booking>> {
        Self::update_in(&mut *self.pool.acquire().await?, id, changes).await
    }

    /// Partial update on an open transaction. Tickets follow the booking to
    /// its new event; callers check capacity and duplicates first.
    pub async fn update_in(
        conn: &mut PgConnection,
        id: i32,
        changes: &BookingChanges,
    ) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET datetime = COALESCE($2, datetime),
                user_id = COALESCE($3, user_id),
                event_id = COALESCE($4, event_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.datetime)
        .bind(changes.user_id)
        .bind(changes.event_id)
        .fetch_optional(conn)
        .await?;

        Ok(booking)
    }

    /// Delete a booking; its tickets and purchases cascade
    pub async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
