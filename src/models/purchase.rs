use super::{Product, Status};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One pre-ordered drink unit attached to a ticket
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: i32,
    pub ticket_id: i32,
    pub status_id: i32,
    pub product_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDetails {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub product: Option<Product>,
    pub status: Option<Status>,
}
