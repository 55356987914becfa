use super::Image;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default capacity of an event when none is given
pub const DEFAULT_MAX_TICKET: i32 = 250;

/// Event model representing a night or concert tickets can be booked for
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
    #[serde(rename = "startDatetime")]
    pub start_datetime: NaiveDateTime,
    #[serde(rename = "endDatetime")]
    pub end_datetime: NaiveDateTime,
    pub name: String,
    pub description: String,
    pub artist: String,
    pub max_ticket: i32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Event {
    /// Number of tickets still available given how many were already issued
    pub fn remaining_capacity(&self, issued: i64) -> i64 {
        (i64::from(self.max_ticket) - issued).max(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventWithImages {
    #[serde(flatten)]
    pub event: Event,
    pub images: Vec<Image>,
}

/// Payload for creating an event
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    #[serde(rename = "startDatetime", alias = "start_datetime")]
    pub start_datetime: NaiveDateTime,
    #[serde(rename = "endDatetime", alias = "end_datetime")]
    pub end_datetime: NaiveDateTime,
    pub name: String,
    pub description: String,
    pub artist: String,
    pub max_ticket: Option<i32>,
}

/// Partial update of an event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventChanges {
    #[serde(rename = "startDatetime", alias = "start_datetime")]
    pub start_datetime: Option<NaiveDateTime>,
    #[serde(rename = "endDatetime", alias = "end_datetime")]
    pub end_datetime: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub artist: Option<String>,
    pub max_ticket: Option<i32>,
}

/// Check the time window and capacity of an event
pub fn validate_event(
    start: NaiveDateTime,
    end: NaiveDateTime,
    name: &str,
    max_ticket: i32,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Event name is required".to_string());
    }
    if end <= start {
        return Err("Event must end after it starts".to_string());
    }
    if max_ticket < 0 {
        return Err("max_ticket must not be negative".to_string());
    }
    Ok(())
}
