use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of tickets and purchases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Waiting,
    Canceled,
    Used,
}

impl TicketStatus {
    /// Convert from the `statuses.name` column
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(TicketStatus::Waiting),
            "canceled" | "cancelled" => Ok(TicketStatus::Canceled),
            "used" => Ok(TicketStatus::Used),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }

    /// Name as stored in `statuses.name`
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "Waiting",
            TicketStatus::Canceled => "Canceled",
            TicketStatus::Used => "Used",
        }
    }

    /// Seeded primary key of the status row
    pub fn id(&self) -> i32 {
        match self {
            TicketStatus::Waiting => 1,
            TicketStatus::Canceled => 2,
            TicketStatus::Used => 3,
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: i32,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Status {
    pub fn status_enum(&self) -> Option<TicketStatus> {
        TicketStatus::from_str(&self.name).ok()
    }
}
