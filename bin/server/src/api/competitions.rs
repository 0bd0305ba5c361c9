//! Competition endpoints.
//!
//! Reads are public (the policy table's read rule includes the anonymous
//! role); create, update, and delete are admin-only. The handlers still
//! route every request through the gate rather than short-circuiting public
//! reads, so the rule table stays the single source of truth.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use concours_core::CompetitionId;
use concours_policy::{Action, ResourceSnapshot, ResourceType};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AppState, ResolvedPrincipal};
use crate::db::competition::{CompetitionRecord, CompetitionRepository, CompetitionStatus};
use crate::error::ApiError;

/// Request body for creating a competition.
#[derive(Debug, Deserialize)]
pub struct CreateCompetitionRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub prize_pool: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Request body for updating a competition. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCompetitionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<CompetitionStatus>,
    pub prize_pool: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn parse_id(id: &str) -> Result<CompetitionId, ApiError> {
    CompetitionId::from_str(id).map_err(|_| ApiError::validation("Invalid competition id"))
}

/// `GET /api/competitions`
pub async fn list(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .require(&principal, ResourceType::Competition, Action::Read, None)?;

    let competitions = CompetitionRepository::new(state.db_pool.clone())
        .list_all()
        .await?;

    Ok(Json(competitions))
}

/// `GET /api/competitions/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.gate.require(
        &principal,
        ResourceType::Competition,
        Action::Read,
        Some(&ResourceSnapshot::competition(id)),
    )?;

    let competition = CompetitionRepository::new(state.db_pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("competition"))?;

    Ok(Json(competition))
}

/// `POST /api/competitions`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Json(request): Json<CreateCompetitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .require(&principal, ResourceType::Competition, Action::Create, None)?;

    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title required"));
    }
    if request.end_date <= request.start_date {
        return Err(ApiError::validation("End date must be after start date"));
    }

    let competition = CompetitionRecord::new(
        request.title,
        request.description,
        request.category,
        request.prize_pool,
        request.start_date,
        request.end_date,
    );
    CompetitionRepository::new(state.db_pool.clone())
        .create(&competition)
        .await?;

    info!(competition_id = %competition.id, "competition created");

    Ok((StatusCode::CREATED, Json(competition)))
}

/// `PUT /api/competitions/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateCompetitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.gate.require(
        &principal,
        ResourceType::Competition,
        Action::Update,
        Some(&ResourceSnapshot::competition(id)),
    )?;

    let repository = CompetitionRepository::new(state.db_pool.clone());
    let mut competition = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("competition"))?;

    if let Some(title) = request.title {
        competition.title = title;
    }
    if let Some(description) = request.description {
        competition.description = description;
    }
    if let Some(category) = request.category {
        competition.category = category;
    }
    if let Some(status) = request.status {
        competition.status = status;
    }
    if let Some(prize_pool) = request.prize_pool {
        competition.prize_pool = prize_pool;
    }
    if let Some(start_date) = request.start_date {
        competition.start_date = start_date;
    }
    if let Some(end_date) = request.end_date {
        competition.end_date = end_date;
    }
    if competition.end_date <= competition.start_date {
        return Err(ApiError::validation("End date must be after start date"));
    }
    competition.updated_at = Utc::now();

    repository.update(&competition).await?;

    Ok(Json(competition))
}

/// `DELETE /api/competitions/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    ResolvedPrincipal(principal): ResolvedPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.gate.require(
        &principal,
        ResourceType::Competition,
        Action::Delete,
        Some(&ResourceSnapshot::competition(id)),
    )?;

    let removed = CompetitionRepository::new(state.db_pool.clone())
        .delete(id)
        .await?;
    if !removed {
        return Err(ApiError::not_found("competition"));
    }

    info!(competition_id = %id, "competition deleted");

    Ok(StatusCode::NO_CONTENT)
}
