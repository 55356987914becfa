use crate::auth;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repositories::{AccessTokenRepository, UserRepository};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub birthdate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A signed-in user and the bearer token issued for them
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<NaiveDateTime>,
}

/// Parse a birthdate given as a calendar date or a full timestamp
pub fn parse_birthdate(raw: &str) -> AppResult<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Validation(format!("Invalid birthdate: {}", raw)));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid birthdate: {} (expected YYYY-MM-DD)",
                raw
            ))
        })
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

impl RegisterRequest {
    /// Validate and normalise the request. The password is hashed here.
    pub fn into_new_user(self) -> AppResult<NewUser> {
        let email = required("email", &self.email)?;
        if !email.contains('@') {
            return Err(AppError::Validation("email must be a valid address".to_string()));
        }
        auth::validate_password(&self.password)?;

        Ok(NewUser {
            email,
            username: required("username", &self.username)?,
            firstname: required("firstname", &self.firstname)?,
            lastname: required("lastname", &self.lastname)?,
            birthdate: parse_birthdate(&self.birthdate)?,
            password_hash: auth::hash_password(&self.password)?,
        })
    }
}

/// Account registration and bearer-token sessions
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_repo: Arc<AccessTokenRepository>,
    token_ttl: Option<chrono::Duration>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        token_repo: Arc<AccessTokenRepository>,
        token_ttl: Option<chrono::Duration>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            token_ttl,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthSession> {
        let new_user = request.into_new_user()?;

        if self.user_repo.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::Validation(format!(
                "An account already exists for {}",
                new_user.email
            )));
        }

        let user = self.user_repo.create(&new_user).await?;
        info!("Registered user {} ({})", user.id, user.username);

        self.issue_token(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthSession> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .user_repo
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !auth::verify_password(&request.password, &user.password) {
            warn!("Failed login for user {}", user.id);
            return Err(invalid());
        }

        info!("User {} logged in", user.id);
        self.issue_token(user).await
    }

    /// Revoke the token carried by an `Authorization` header
    pub async fn logout(&self, header: &str) -> AppResult<()> {
        let token = auth::parse_bearer(header)?;
        if !self.token_repo.delete_by_hash(&auth::hash_token(token)).await? {
            return Err(AppError::Unauthorized("Unknown access token".to_string()));
        }
        Ok(())
    }

    /// Resolve the user behind an `Authorization` header
    pub async fn authenticate(&self, header: &str) -> AppResult<User> {
        let token = auth::parse_bearer(header)?;
        let now = Utc::now().naive_utc();

        let stored = self
            .token_repo
            .find_valid_by_hash(&auth::hash_token(token), now)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired access token".to_string()))?;

        self.token_repo.touch(stored.id, now).await?;

        self.user_repo
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }

    async fn issue_token(&self, user: User) -> AppResult<AuthSession> {
        let token = auth::generate_token();
        let expires_at = self.token_ttl.map(|ttl| Utc::now().naive_utc() + ttl);

        self.token_repo
            .create(user.id, &auth::hash_token(&token), Some("api"), expires_at)
            .await?;

        Ok(AuthSession {
            user,
            token_type: "bearer",
            token,
            expires_at,
        })
    }
}
