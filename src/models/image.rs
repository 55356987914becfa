use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: i32,
    pub link: String,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: NaiveDateTime,
}

/// Image row joined through a pivot table, tagged with the id of the owning row
#[derive(Debug, Clone, FromRow)]
pub struct LinkedImage {
    pub owner_id: i32,
    pub id: i32,
    pub link: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<LinkedImage> for Image {
    fn from(row: LinkedImage) -> Self {
        Self {
            id: row.id,
            link: row.link,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
