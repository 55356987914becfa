use super::{Event, TicketDetails, UserSummary};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A reservation made by one user for an event, covering themselves and their guests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub datetime: NaiveDateTime,
    pub user_id: i32,
    pub event_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Booking with its owner, event and tickets loaded
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<UserSummary>,
    pub event: Option<Event>,
    pub tickets: Vec<TicketDetails>,
}

impl BookingDetails {
    pub fn purchase_count(&self) -> usize {
        self.tickets.iter().map(|t| t.purchases.len()).sum()
    }
}

/// Partial update of a booking
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChanges {
    pub datetime: Option<NaiveDateTime>,
    pub user_id: Option<i32>,
    pub event_id: Option<i32>,
}
