//! Submission endpoints.
//!
//! Creating a submission binds it to the authenticated candidate; the
//! client cannot submit on someone else's behalf. Update and delete load
//! the stored row first and hand its owner to the gate as the resource
//! snapshot, so the owner override is evaluated against what the database
//! says, never against anything the client claims.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use concours_core::{CompetitionId, SubmissionId};
use concours_policy::{Action, ResourceSnapshot, ResourceType};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, ResolvedPrincipal};
use crate::db::competition::CompetitionRepository;
use crate::db::submission::{SubmissionRecord, SubmissionRepository};
use crate::error::ApiError;

/// Request body for creating a submission.
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub competition_id: String,
    pub title: String,
    pub description: String,
    pub file_url: String,
}

/// Request body for updating a submission. Absent fields are unchanged.
///
/// Status and ownership are not client-updatable.
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
}

fn parse_id(id: &str) -> Result<SubmissionId, ApiError> {
    SubmissionId::from_str(id).map_err(|_| ApiError::validation("Invalid submission id"))
}

/// `GET /api/submissions/competition/{competition_id}`
pub async fn list_by_competition(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(competition_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let competition_id = CompetitionId::from_str(&competition_id)
        .map_err(|_| ApiError::validation("Invalid competition id"))?;
    state
        .gate
        .require(&principal, ResourceType::Submission, Action::Read, None)?;

    let submissions = SubmissionRepository::new(state.db_pool.clone())
        .list_by_competition(competition_id)
        .await?;

    Ok(Json(submissions))
}

/// `POST /api/submissions`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .require(&principal, ResourceType::Submission, Action::Create, None)?;

    // The gate only allows authenticated candidates here, so an id exists.
    let candidate_id = principal.account_id().ok_or(ApiError::NotAuthorized)?;

    let competition_id = CompetitionId::from_str(&request.competition_id)
        .map_err(|_| ApiError::validation("Invalid competition id"))?;
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title required"));
    }

    let competition = CompetitionRepository::new(state.db_pool.clone())
        .find_by_id(competition_id)
        .await?
        .ok_or_else(|| ApiError::not_found("competition"))?;

    let submission = SubmissionRecord::new(
        competition.id,
        candidate_id,
        request.title,
        request.description,
        request.file_url,
    );
    SubmissionRepository::new(state.db_pool.clone())
        .create(&submission)
        .await?;

    info!(
        submission_id = %submission.id,
        competition_id = %competition.id,
        "submission created"
    );

    Ok((StatusCode::CREATED, Json(submission)))
}

/// `PUT /api/submissions/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let repository = SubmissionRepository::new(state.db_pool.clone());
    let mut submission = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("submission"))?;

    state.gate.require(
        &principal,
        ResourceType::Submission,
        Action::Update,
        Some(&ResourceSnapshot::submission(
            submission.id,
            submission.candidate_id,
        )),
    )?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(ApiError::validation("Title required"));
        }
        submission.title = title;
    }
    if let Some(description) = request.description {
        submission.description = description;
    }
    if let Some(file_url) = request.file_url {
        submission.file_url = file_url;
    }
    submission.updated_at = Utc::now();

    repository.update(&submission).await?;

    Ok(Json(submission))
}

/// `DELETE /api/submissions/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let repository = SubmissionRepository::new(state.db_pool.clone());
    let submission = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("submission"))?;

    state.gate.require(
        &principal,
        ResourceType::Submission,
        Action::Delete,
        Some(&ResourceSnapshot::submission(
            submission.id,
            submission.candidate_id,
        )),
    )?;

    repository.delete(id).await?;

    info!(submission_id = %id, "submission deleted");

    Ok(StatusCode::NO_CONTENT)
}
