//! Registration, sessions and the signed-in user's profile picture.

use super::extract::{AuthUser, AuthorizationHeader, JsonBody};
use super::response::{created, done, ok, ApiJson};
use crate::error::{AppError, AppResult};
use crate::models::{User, UserWithImage};
use crate::services::{AuthSession, LoginRequest, RegisterRequest};
use crate::AppState;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use std::sync::Arc;

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, ApiJson<AuthSession>)> {
    let session = state.auth.register(request).await?;
    Ok(created(session, "Account created"))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<ApiJson<AuthSession>> {
    Ok(ok(state.auth.login(request).await?))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthorizationHeader(header): AuthorizationHeader,
) -> AppResult<ApiJson<Option<()>>> {
    state.auth.logout(&header).await?;
    Ok(done("Logged out"))
}

/// GET /auth/me
pub async fn me(AuthUser(user): AuthUser) -> ApiJson<User> {
    ok(user)
}

/// PUT /profile/picture
///
/// Multipart form with a single `image` file field.
pub async fn update_profile_picture(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> AppResult<ApiJson<UserWithImage>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("image must be a file".to_string()))?;
        let bytes = field.bytes().await?;

        let updated = state
            .uploads
            .store_profile_picture(user.id, &filename, &bytes)
            .await?;
        return Ok(ok(updated));
    }

    Err(AppError::Validation("Missing image field".to_string()))
}
