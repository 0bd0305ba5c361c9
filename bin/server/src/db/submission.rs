//! Database repository for submissions.
//!
//! Submissions carry their owner (`candidate_id`) in the row. Handlers
//! surface it to the policy gate as the resource snapshot's owner, which is
//! how candidates get to update or withdraw their own entries but nobody
//! else's.

use chrono::{DateTime, Utc};
use concours_core::{AccountId, CompetitionId, SubmissionId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Review status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Awaiting review.
    Pending,
    /// Accepted into the competition.
    Approved,
    /// Rejected by review.
    Rejected,
}

impl SubmissionStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// A submission record from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Submission ID.
    pub id: SubmissionId,
    /// Competition this entry belongs to.
    pub competition_id: CompetitionId,
    /// The candidate who owns this submission.
    pub candidate_id: AccountId,
    /// Entry title.
    pub title: String,
    /// Entry description.
    pub description: String,
    /// URL of the submitted work.
    pub file_url: String,
    /// Review status.
    pub status: SubmissionStatus,
    /// When created.
    pub created_at: DateTime<Utc>,
    /// When last updated.
    pub updated_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Creates a new pending submission owned by the given candidate.
    #[must_use]
    pub fn new(
        competition_id: CompetitionId,
        candidate_id: AccountId,
        title: String,
        description: String,
        file_url: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubmissionId::new(),
            competition_id,
            candidate_id,
            title,
            description,
            file_url,
            status: SubmissionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row type for submission queries.
#[derive(FromRow)]
struct SubmissionRow {
    id: String,
    competition_id: String,
    candidate_id: String,
    title: String,
    description: String,
    file_url: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn try_into_record(self) -> Result<SubmissionRecord, sqlx::Error> {
        let id = SubmissionId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid submission id '{}': {}", self.id, e),
            )))
        })?;
        let competition_id = CompetitionId::from_str(&self.competition_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid competition id '{}': {}", self.competition_id, e),
            )))
        })?;
        let candidate_id = AccountId::from_str(&self.candidate_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid account id '{}': {}", self.candidate_id, e),
            )))
        })?;
        let status = SubmissionStatus::from_str(&self.status).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            )))
        })?;

        Ok(SubmissionRecord {
            id,
            competition_id,
            candidate_id,
            title: self.title,
            description: self.description,
            file_url: self.file_url,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for submission operations.
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists submissions for a competition, oldest first.
    pub async fn list_by_competition(
        &self,
        competition_id: CompetitionId,
    ) -> Result<Vec<SubmissionRecord>, sqlx::Error> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, competition_id, candidate_id, title, description, file_url,
                   status, created_at, updated_at
            FROM submissions
            WHERE competition_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(competition_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_record()).collect()
    }

    /// Finds a submission by ID.
    pub async fn find_by_id(
        &self,
        id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, sqlx::Error> {
        let row: Option<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, competition_id, candidate_id, title, description, file_url,
                   status, created_at, updated_at
            FROM submissions
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_record()?)),
            None => Ok(None),
        }
    }

    /// Creates a new submission.
    pub async fn create(&self, submission: &SubmissionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO submissions
                (id, competition_id, candidate_id, title, description, file_url,
                 status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(submission.id.to_string())
        .bind(submission.competition_id.to_string())
        .bind(submission.candidate_id.to_string())
        .bind(&submission.title)
        .bind(&submission.description)
        .bind(&submission.file_url)
        .bind(submission.status.as_str())
        .bind(submission.created_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates the content fields of a submission. Status and ownership are
    /// deliberately not updatable.
    pub async fn update(&self, submission: &SubmissionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE submissions
            SET title = $2, description = $3, file_url = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(submission.id.to_string())
        .bind(&submission.title)
        .bind(&submission.description)
        .bind(&submission.file_url)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a submission, returning whether a row was removed.
    pub async fn delete(&self, id: SubmissionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM submissions
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Approved,
            SubmissionStatus::Rejected,
        ] {
            assert_eq!(SubmissionStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn competition_delete_cascades_to_submissions() {
        // An admin deleting a competition must not trip over its entries
        // with an FK violation; the child rows go with it.
        let schema = include_str!("../../migrations/0004_submissions.sql");
        assert!(schema.contains("REFERENCES competitions(id) ON DELETE CASCADE"));
    }

    #[test]
    fn new_submission_is_pending_and_owned() {
        let candidate = AccountId::new();
        let record = SubmissionRecord::new(
            CompetitionId::new(),
            candidate,
            "Opera cake".to_string(),
            "Seven layers".to_string(),
            "https://files.example/opera.jpg".to_string(),
        );
        assert_eq!(record.status, SubmissionStatus::Pending);
        assert_eq!(record.candidate_id, candidate);
    }
}
