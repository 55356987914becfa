use super::RepoResult;
use crate::models::{Ticket, TicketStatus};
use sqlx::{PgConnection, PgPool};

const TICKET_COLUMNS: &str = "id, qrcode_url, user_id, status_id, booking_id, created_at, updated_at";

/// Repository for ticket data access
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> RepoResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    pub async fn find_by_id(&self, id: i32) -> RepoResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Lock a ticket row until the surrounding transaction ends
    pub async fn find_for_update(conn: &mut PgConnection, id: i32) -> RepoResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(ticket)
    }

    pub async fn find_by_booking_in(conn: &mut PgConnection, booking_id: i32) -> RepoResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE booking_id = $1 ORDER BY id"
        ))
        .bind(booking_id)
        .fetch_all(conn)
        .await?;

        Ok(tickets)
    }

    /// Tickets belonging to any of the given bookings, in creation order
    pub async fn find_by_bookings(&self, booking_ids: &[i32]) -> RepoResult<Vec<Ticket>> {
        if booking_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE booking_id = ANY($1) ORDER BY id"
        ))
        .bind(booking_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Whether a user already holds a ticket for an event, in any booking
    pub async fn user_has_ticket_for_event(&self, user_id: i32, event_id: i32) -> RepoResult<bool> {
        Self::user_has_ticket_for_event_in(&mut *self.pool.acquire().await?, user_id, event_id).await
    }

    pub async fn user_has_ticket_for_event_in(
        conn: &mut PgConnection,
        user_id: i32,
        event_id: i32,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM tickets t
                JOIN bookings b ON b.id = t.booking_id
                WHERE t.user_id = $1 AND b.event_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Insert a ticket on an open transaction. New tickets start out Waiting.
    pub async fn insert(conn: &mut PgConnection, booking_id: i32, user_id: i32) -> RepoResult<Ticket> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (qrcode_url, booking_id, user_id, status_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(Ticket::qrcode_url_for(booking_id, user_id))
        .bind(booking_id)
        .bind(user_id)
        .bind(TicketStatus::Waiting.id())
        .fetch_one(conn)
        .await?;

        Ok(ticket)
    }

    /// Move a ticket to another status row. Returns `None` when the ticket does not exist.
    pub async fn update_status(&self, id: i32, status_id: i32) -> RepoResult<Option<Ticket>> {
        Self::update_status_in(&mut *self.pool.acquire().await?, id, status_id).await
    }

    pub async fn update_status_in(
        conn: &mut PgConnection,
        id: i32,
        status_id: i32,
    ) -> RepoResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET status_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status_id)
        .fetch_optional(conn)
        .await?;

        Ok(ticket)
    }
}
