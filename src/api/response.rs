use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub type ApiJson<T> = Json<ApiResponse<T>>;

pub fn ok<T: Serialize>(data: T) -> ApiJson<T> {
    Json(ApiResponse {
        success: true,
        data,
        message: None,
    })
}

pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> ApiJson<T> {
    Json(ApiResponse {
        success: true,
        data,
        message: Some(message.into()),
    })
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> (StatusCode, ApiJson<T>) {
    (StatusCode::CREATED, ok_with_message(data, message))
}

/// Success without a payload; `data` is rendered as `null`
pub fn done(message: impl Into<String>) -> ApiJson<Option<()>> {
    ok_with_message(None, message)
}
