use super::response::{ok, ApiJson};
use crate::error::AppResult;
use crate::services::InstagramPost;
use crate::AppState;
use axum::extract::State;
use std::sync::Arc;

/// GET /instagram/latest
pub async fn latest(State(state): State<Arc<AppState>>) -> AppResult<ApiJson<Vec<InstagramPost>>> {
    Ok(ok(state.instagram.latest().await?))
}
