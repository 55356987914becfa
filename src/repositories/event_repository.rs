use super::RepoResult;
use crate::models::{Event, EventChanges, EventInput, DEFAULT_MAX_TICKET};
use sqlx::{PgConnection, PgPool};

const EVENT_COLUMNS: &str = "id, start_datetime, end_datetime, name, description, artist, \
                             max_ticket, created_at, updated_at";

/// Repository for event data access
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new EventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All events, soonest first
    pub async fn list(&self) -> RepoResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_datetime ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Find an event by id
    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Event>> {
        Self::find_by_id_in(&mut *self.pool.acquire().await?, id).await
    }

    /// Find an event by id, locking the row until the surrounding transaction ends.
    ///
    /// Concurrent bookings for the same event serialize on this lock so the
    /// capacity check cannot be raced.
    pub async fn find_for_update(conn: &mut PgConnection, id: i32) -> RepoResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    async fn find_by_id_in(conn: &mut PgConnection, id: i32) -> RepoResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(event)
    }

    /// Events for a set of ids
    pub async fn find_by_ids(&self, ids: &[i32]) -> RepoResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Insert a new event
    pub async fn create(&self, input: &EventInput) -> RepoResult<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (start_datetime, end_datetime, name, description, artist, max_ticket)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(input.start_datetime)
        .bind(input.end_datetime)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.artist)
        .bind(input.max_ticket.unwrap_or(DEFAULT_MAX_TICKET))
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Apply a partial update. Returns `None` when the event does not exist.
    pub async fn update(&self, id: i32, changes: &EventChanges) -> RepoResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET start_datetime = COALESCE($2, start_datetime),
                end_datetime = COALESCE($3, end_datetime),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                artist = COALESCE($6, artist),
                max_ticket = COALESCE($7, max_ticket),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.start_datetime)
        .bind(changes.end_datetime)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.artist.as_deref())
        .bind(changes.max_ticket)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete an event; bookings, tickets and purchases cascade
    pub async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of tickets issued for an event across all bookings
    pub async fn count_tickets(&self, event_id: i32) -> RepoResult<i64> {
        Self::count_tickets_in(&mut *self.pool.acquire().await?, event_id).await
    }

    pub async fn count_tickets_in(conn: &mut PgConnection, event_id: i32) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tickets t
            JOIN bookings b ON b.id = t.booking_id
            WHERE b.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }
}
