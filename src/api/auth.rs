//! Authentication endpoints.

use std::sync::OnceLock;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::{bearer_token, Claims, CurrentUser, TokenError, TokenSigner};
use crate::errors::AppError;
use crate::models::{UserRecord, UserSummary};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A freshly issued token and the user it belongs to.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub exp: i64,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub exp: i64,
}

/// Hash checked when no user matches the login, so an unknown name costs the same bcrypt work as
/// a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        bcrypt::hash("no-such-user", bcrypt::DEFAULT_COST).unwrap_or_else(|e| {
            tracing::warn!("Cannot build placeholder password hash: {}", e);
            String::new()
        })
    })
}

/// Check a password against the user's hash, or against the placeholder when there is no user.
fn check_password(password: &str, hash: Option<&str>) -> Result<bool, bcrypt::BcryptError> {
    match hash {
        Some(hash) => bcrypt::verify(password, hash),
        None => bcrypt::verify(password, dummy_hash()).map(|_| false),
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

fn issue_for(signer: &TokenSigner, user: &UserRecord) -> ApiResult<TokenResponse> {
    let (token, claims) = signer.issue(user.id).map_err(|e| match e {
        TokenError::MissingSecret => {
            tracing::error!("Cannot issue token for user {}: {}", user.id, e);
            AppError::TokenConfig("JWT not configured".to_string())
        }
        other => AppError::Internal(format!("Token issuance failed: {}", other)),
    })?;

    success(TokenResponse {
        token,
        exp: claims.exp,
        user: user.summary(),
    })
}

/// Verify the request's bearer token, with the two rejection messages clients rely on.
fn verified_claims(signer: &TokenSigner, headers: &HeaderMap) -> Result<Claims, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    signer.verify(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })
}

/// POST /auth/login - Exchange credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Ok(Json(request)) = body else {
        return Err(invalid_credentials());
    };
    let (Some(login), Some(password)) = (
        request.username.filter(|u| !u.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(invalid_credentials());
    };

    let user = state.repo.find_user_by_login(login.trim()).await?;

    let hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || check_password(&password, hash.as_deref()))
        .await
        .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?
        .unwrap_or_else(|e| {
            tracing::warn!("Unreadable password hash: {}", e);
            false
        });

    let Some(user) = user.filter(|_| matches) else {
        return Err(invalid_credentials());
    };

    issue_for(&state.signer, &user)
}

/// POST /auth/validate - Check the bearer token.
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ValidateResponse> {
    let claims = verified_claims(&state.signer, &headers)?;
    success(ValidateResponse {
        valid: true,
        exp: claims.exp,
    })
}

/// POST /auth/refresh - Reissue a still-valid token for another seven days.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<TokenResponse> {
    let claims = verified_claims(&state.signer, &headers)?;

    let user = state
        .repo
        .get_user(claims.subject())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

    issue_for(&state.signer, &user)
}

/// GET /auth/me - The authenticated user.
pub async fn current_user(CurrentUser(user): CurrentUser) -> ApiResult<UserSummary> {
    success(user.summary())
}
