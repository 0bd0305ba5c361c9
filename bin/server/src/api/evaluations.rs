//! Jury evaluation endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use concours_core::SubmissionId;
use concours_policy::{Action, ResourceType};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, ResolvedPrincipal};
use crate::db::evaluation::{EvaluationRecord, EvaluationRepository, score_in_range};
use crate::db::submission::SubmissionRepository;
use crate::error::ApiError;

/// Request body for creating an evaluation.
#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    pub submission_id: String,
    pub creativity: i16,
    pub technique: i16,
    pub presentation: i16,
    #[serde(default)]
    pub comment: String,
}

fn parse_submission_id(id: &str) -> Result<SubmissionId, ApiError> {
    SubmissionId::from_str(id).map_err(|_| ApiError::validation("Invalid submission id"))
}

/// `POST /api/evaluations`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Json(request): Json<CreateEvaluationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .require(&principal, ResourceType::Evaluation, Action::Create, None)?;

    // The gate only allows jury members here, so an id exists.
    let jury_id = principal.account_id().ok_or(ApiError::NotAuthorized)?;

    let submission_id = parse_submission_id(&request.submission_id)?;
    for score in [request.creativity, request.technique, request.presentation] {
        if !score_in_range(score) {
            return Err(ApiError::validation("Scores must be between 0 and 10"));
        }
    }

    SubmissionRepository::new(state.db_pool.clone())
        .find_by_id(submission_id)
        .await?
        .ok_or_else(|| ApiError::not_found("submission"))?;

    let repository = EvaluationRepository::new(state.db_pool.clone());
    if repository
        .find_by_submission_and_jury(submission_id, jury_id)
        .await?
        .is_some()
    {
        return Err(ApiError::validation(
            "Submission already evaluated by this jury member",
        ));
    }

    let evaluation = EvaluationRecord::new(
        submission_id,
        jury_id,
        request.creativity,
        request.technique,
        request.presentation,
        request.comment,
    );
    repository.create(&evaluation).await?;

    info!(
        evaluation_id = %evaluation.id,
        submission_id = %submission_id,
        "evaluation created"
    );

    Ok((StatusCode::CREATED, Json(evaluation)))
}

/// `GET /api/evaluations/submission/{id}`
pub async fn list_by_submission(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    state
        .gate
        .require(&principal, ResourceType::Evaluation, Action::Read, None)?;

    let evaluations = EvaluationRepository::new(state.db_pool.clone())
        .list_by_submission(submission_id)
        .await?;

    Ok(Json(evaluations))
}
