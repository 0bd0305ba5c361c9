//! Authentication routes for registration, login, and logout.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Duration as TimeDuration;
use tracing::info;

use super::{AppState, middleware::SESSION_COOKIE};
use crate::error::ApiError;
use crate::types::AccountResponse;
use concours_platform_access::{Account, Session, SessionId, hash_credential, verify_credential};

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque session credential, also set as the session cookie. Returned
    /// in the body for clients that prefer bearer authentication.
    pub token: String,
    pub account: AccountResponse,
}

/// Registers a new candidate account.
///
/// Accounts start in `Pending` status; an admin must activate them before
/// they can log in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&request)?;

    if state
        .identity
        .find_account_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::validation("Email is already registered"));
    }

    let credential_hash = hash_credential(&request.password)
        .map_err(|e| ApiError::Database {
            details: e.to_string(),
        })?;

    let account = Account::register(request.email, credential_hash, request.display_name);
    state.identity.create_account(&account).await?;

    info!(account_id = %account.id(), "account registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// Logs in with email and password, establishing a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .identity
        .find_account_by_email(&request.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_credential(account.credential_hash(), &request.password) {
        return Err(ApiError::InvalidCredentials);
    }

    if !account.can_authenticate() {
        return Err(ApiError::AccountNotActive);
    }

    let duration_minutes = state.session_config.duration_minutes;
    let session = Session::new(
        SessionId::generate(),
        account.id(),
        ChronoDuration::minutes(duration_minutes),
    );
    state.identity.create_session(&session).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.id().as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(duration_minutes));

    info!(account_id = %account.id(), "login");

    let response = LoginResponse {
        token: session.id().as_str().to_string(),
        account: AccountResponse::from(&account),
    };

    Ok((jar.add(cookie), Json(response)))
}

/// Logs out by deleting the session, if one is presented.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::from(session_cookie.value());
        // Best-effort: a missing session is already logged out.
        let _ = state.identity.delete_session(&session_id).await;
    }

    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    Ok((jar.add(remove_session), StatusCode::NO_CONTENT))
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if !request.email.contains('@') {
        return Err(ApiError::validation("Valid email required"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if request.display_name.trim().is_empty() {
        return Err(ApiError::validation("Display name required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn registration_requires_email_shape() {
        let result = validate_registration(&request("not-an-email", "long enough pw", "A"));
        assert!(result.is_err());
    }

    #[test]
    fn registration_requires_password_length() {
        let result = validate_registration(&request("a@example.com", "short", "A"));
        assert!(result.is_err());
    }

    #[test]
    fn registration_requires_display_name() {
        let result = validate_registration(&request("a@example.com", "long enough pw", "  "));
        assert!(result.is_err());
    }

    #[test]
    fn valid_registration_passes() {
        let result = validate_registration(&request("a@example.com", "long enough pw", "Alice"));
        assert!(result.is_ok());
    }
}
