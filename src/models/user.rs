use super::Image;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account. The password column holds an Argon2 PHC string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub is_verified: bool,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub birthdate: NaiveDateTime,
    pub fidelity_point: i32,
    pub image_id: Option<i32>,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Public projection of a user, embedded in bookings, tickets and messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub fidelity_point: i32,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            fidelity_point: user.fidelity_point,
        }
    }
}

/// User together with its profile picture
#[derive(Debug, Clone, Serialize)]
pub struct UserWithImage {
    #[serde(flatten)]
    pub user: User,
    pub image: Option<Image>,
}

/// Fields needed to insert a user; `password_hash` must already be hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub birthdate: NaiveDateTime,
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub is_verified: Option<bool>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub fidelity_point: Option<i32>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.is_verified.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.username.is_none()
            && self.firstname.is_none()
            && self.lastname.is_none()
            && self.fidelity_point.is_none()
    }
}
