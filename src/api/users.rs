use super::extract::{parse_id, JsonBody, QueryParams};
use super::response::{ok, ApiJson};
use crate::auth;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserChanges, UserWithImage};
use crate::services::{BookingWithEvent, UserBookingTickets};
use crate::AppState;
use axum::extract::{Path, State};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub is_verified: Option<bool>,
    pub fidelity_point: Option<i32>,
}

fn non_blank(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AppError::Validation(format!("{} must not be empty", field))),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

impl UpdateUserRequest {
    fn into_changes(self) -> AppResult<UserChanges> {
        let email = non_blank("email", self.email)?;
        if email.as_deref().map_or(false, |e| !e.contains('@')) {
            return Err(AppError::Validation("email must be a valid address".to_string()));
        }
        if self.fidelity_point.map_or(false, |p| p < 0) {
            return Err(AppError::Validation("fidelity_point must not be negative".to_string()));
        }

        let password_hash = match self.password {
            Some(password) => {
                auth::validate_password(&password)?;
                Some(auth::hash_password(&password)?)
            }
            None => None,
        };

        Ok(UserChanges {
            is_verified: self.is_verified,
            email,
            password_hash,
            username: non_blank("username", self.username)?,
            firstname: non_blank("firstname", self.firstname)?,
            lastname: non_blank("lastname", self.lastname)?,
            fidelity_point: self.fidelity_point,
        })
    }
}

async fn with_image(state: &AppState, user: User) -> AppResult<UserWithImage> {
    let image = match user.image_id {
        Some(image_id) => state.image_repo.find_by_id(image_id).await?,
        None => None,
    };
    Ok(UserWithImage { user, image })
}

/// GET /users?email=
pub async fn find_by_email(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> AppResult<ApiJson<UserWithImage>> {
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("email query parameter is required".to_string()))?;

    let user = state
        .user_repo
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user with email {}", email.trim())))?;

    Ok(ok(with_image(&state, user).await?))
}

/// GET /users/:id
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<UserWithImage>> {
    let id = parse_id(&id, "user")?;
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(ok(with_image(&state, user).await?))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> AppResult<ApiJson<UserWithImage>> {
    let id = parse_id(&id, "user")?;
    let changes = request.into_changes()?;

    let user = state
        .user_repo
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(ok(with_image(&state, user).await?))
}

/// GET /users/:id/bookings
pub async fn bookings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Vec<BookingWithEvent>>> {
    let id = parse_id(&id, "user")?;
    Ok(ok(state.bookings.bookings_for_user(id).await?))
}

/// GET /users/:id/bookings/:booking_id/tickets
pub async fn booking_tickets(
    State(state): State<Arc<AppState>>,
    Path((id, booking_id)): Path<(String, String)>,
) -> AppResult<ApiJson<UserBookingTickets>> {
    let user_id = parse_id(&id, "user")?;
    let booking_id = parse_id(&booking_id, "booking")?;
    Ok(ok(state.bookings.tickets_for_user(user_id, booking_id).await?))
}
