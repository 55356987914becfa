use super::UserSummary;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Message sent by a user to the venue from the in-app chat
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i32,
    pub subject: String,
    pub body: String,
    pub user_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageWithUser {
    #[serde(flatten)]
    pub message: Message,
    pub user: Option<UserSummary>,
}
