use super::extract::{parse_id, JsonBody, QueryParams};
use super::response::{created, ok, ApiJson};
use crate::error::{AppError, AppResult};
use crate::models::{Message, MessageWithUser, UserSummary};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewMessageRequest {
    pub subject: String,
    pub body: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: i32,
}

impl NewMessageRequest {
    /// Trimmed subject and body; both must be non-empty
    fn validated(&self) -> AppResult<(&str, &str)> {
        let subject = self.subject.trim();
        let body = self.body.trim();
        if subject.is_empty() {
            return Err(AppError::Validation("subject must not be empty".to_string()));
        }
        if body.is_empty() {
            return Err(AppError::Validation("body must not be empty".to_string()));
        }
        Ok((subject, body))
    }
}

/// GET /messages?userId=
pub async fn list(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<MessagesQuery>,
) -> AppResult<ApiJson<Vec<Message>>> {
    let raw = query
        .user_id
        .ok_or_else(|| AppError::Validation("userId query parameter is required".to_string()))?;
    let user_id = parse_id(&raw, "user")?;

    if state.user_repo.find_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    Ok(ok(state.message_repo.find_by_user(user_id).await?))
}

/// POST /messages
pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<NewMessageRequest>,
) -> AppResult<(StatusCode, ApiJson<MessageWithUser>)> {
    let (subject, body) = request.validated()?;

    let user = state
        .user_repo
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    let message = state.message_repo.create(user.id, subject, body).await?;
    tracing::info!("User {} sent message {}", user.id, message.id);

    Ok(created(
        MessageWithUser {
            message,
            user: Some(UserSummary::from(&user)),
        },
        "Message sent",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_request_is_trimmed() {
        let request: NewMessageRequest = serde_json::from_value(serde_json::json!({
            "subject": "  Lost jacket ",
            "body": " Black, left in the cloakroom ",
            "userId": 3
        }))
        .unwrap();

        assert_eq!(request.validated().unwrap(), ("Lost jacket", "Black, left in the cloakroom"));
    }

    #[test]
    fn test_message_request_rejects_blank_fields() {
        let request = NewMessageRequest {
            subject: "Hello".to_string(),
            body: "   ".to_string(),
            user_id: 1,
        };
        assert!(request.validated().is_err());
    }
}
