//! Account record endpoints.
//!
//! `/api/users/me` serves the authenticated principal's own record through
//! the owner-override rules; the admin surface (`/api/users`,
//! `/api/users/{id}`, status transitions) goes through the admin-only
//! rules. The `{id}` in a path is never trusted as proof of ownership: the
//! snapshot the gate sees is always built from the stored record.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use concours_core::AccountId;
use concours_platform_access::{AccountStatus, hash_credential};
use concours_policy::{Action, ResourceSnapshot, ResourceType};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, ResolvedPrincipal};
use crate::error::ApiError;
use crate::types::AccountResponse;

/// Request body for updating one's own profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

/// Request body for an admin status transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AccountStatus,
}

fn parse_id(id: &str) -> Result<AccountId, ApiError> {
    AccountId::from_str(id).map_err(|_| ApiError::validation("Invalid account id"))
}

/// `GET /api/users/me`
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = principal.account_id().ok_or(ApiError::NotAuthorized)?;
    state.gate.require(
        &principal,
        ResourceType::UserRecord,
        Action::ReadOwn,
        Some(&ResourceSnapshot::user_record(account_id)),
    )?;

    let account = state
        .identity
        .find_account(account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("account"))?;

    Ok(Json(AccountResponse::from(&account)))
}

/// `PATCH /api/users/me`
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = principal.account_id().ok_or(ApiError::NotAuthorized)?;
    state.gate.require(
        &principal,
        ResourceType::UserRecord,
        Action::UpdateOwnProfile,
        Some(&ResourceSnapshot::user_record(account_id)),
    )?;

    let mut account = state
        .identity
        .find_account(account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("account"))?;

    if let Some(display_name) = request.display_name {
        if display_name.trim().is_empty() {
            return Err(ApiError::validation("Display name required"));
        }
        account.set_display_name(display_name);
    }
    if let Some(password) = request.password {
        if password.len() < 8 {
            return Err(ApiError::validation(
                "Password must be at least 8 characters",
            ));
        }
        let hash = hash_credential(&password).map_err(|e| ApiError::Database {
            details: e.to_string(),
        })?;
        account.set_credential_hash(hash);
    }

    state.identity.update_account(&account).await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// `GET /api/users`
pub async fn list(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .require(&principal, ResourceType::UserRecord, Action::ReadAny, None)?;

    let accounts = state.identity.list_accounts().await?;
    let response: Vec<AccountResponse> = accounts.iter().map(AccountResponse::from).collect();

    Ok(Json(response))
}

/// `GET /api/users/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.gate.require(
        &principal,
        ResourceType::UserRecord,
        Action::ReadAny,
        Some(&ResourceSnapshot::user_record(id)),
    )?;

    let account = state
        .identity
        .find_account(id)
        .await?
        .ok_or_else(|| ApiError::not_found("account"))?;

    Ok(Json(AccountResponse::from(&account)))
}

/// `PATCH /api/users/{id}/status`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    // Status transitions are never owner-overridable: the rule is admin-only
    // and the snapshot owner is the target account, not the caller.
    state.gate.require(
        &principal,
        ResourceType::UserRecord,
        Action::UpdateStatus,
        Some(&ResourceSnapshot::user_record(id)),
    )?;

    let mut account = state
        .identity
        .find_account(id)
        .await?
        .ok_or_else(|| ApiError::not_found("account"))?;

    account.set_status(request.status);
    state.identity.update_account_status(id, request.status).await?;

    info!(account_id = %id, status = %request.status, "account status updated");

    Ok(Json(AccountResponse::from(&account)))
}
