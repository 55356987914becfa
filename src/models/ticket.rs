use super::{PurchaseDetails, Status, TicketStatus, UserSummary};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

/// One admission for one user inside a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i32,
    pub qrcode_url: String,
    pub user_id: i32,
    pub status_id: i32,
    pub booking_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Ticket {
    /// QR image URL for the ticket a user holds in a booking
    pub fn qrcode_url_for(booking_id: i32, user_id: i32) -> String {
        format!("{}booking_{}_user_{}", QR_SERVICE_URL, booking_id, user_id)
    }
}

/// Ticket with holder, status and pre-ordered drinks
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetails {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub user: Option<UserSummary>,
    pub status: Option<Status>,
    pub purchases: Vec<PurchaseDetails>,
}

/// Payload encoded in a ticket QR code.
///
/// It is plain JSON: anyone holding the code can decode and re-display it.
/// Door staff validate it by looking up `ticket_id` and checking the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPass {
    pub ticket_id: i32,
    pub booking_id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub status: TicketStatus,
}

impl TicketPass {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
