//! Database repository for jury evaluations.

use chrono::{DateTime, Utc};
use concours_core::{AccountId, EvaluationId, SubmissionId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Inclusive bounds for a single evaluation score.
pub const SCORE_MIN: i16 = 0;
/// See [`SCORE_MIN`].
pub const SCORE_MAX: i16 = 10;

/// A jury evaluation record from the database.
///
/// Each jury member scores a submission at most once; the table enforces
/// this with a unique constraint on `(submission_id, jury_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Evaluation ID.
    pub id: EvaluationId,
    /// The submission being scored.
    pub submission_id: SubmissionId,
    /// The jury member who produced this evaluation.
    pub jury_id: AccountId,
    /// Creativity score, 0 to 10.
    pub creativity: i16,
    /// Technique score, 0 to 10.
    pub technique: i16,
    /// Presentation score, 0 to 10.
    pub presentation: i16,
    /// Free-form comment.
    pub comment: String,
    /// When created.
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Creates a new evaluation record.
    #[must_use]
    pub fn new(
        submission_id: SubmissionId,
        jury_id: AccountId,
        creativity: i16,
        technique: i16,
        presentation: i16,
        comment: String,
    ) -> Self {
        Self {
            id: EvaluationId::new(),
            submission_id,
            jury_id,
            creativity,
            technique,
            presentation,
            comment,
            created_at: Utc::now(),
        }
    }

    /// Returns the sum of the three scores.
    #[must_use]
    pub fn total(&self) -> i16 {
        self.creativity + self.technique + self.presentation
    }
}

/// Returns true if the score falls within the allowed range.
#[must_use]
pub fn score_in_range(score: i16) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}

/// Row type for evaluation queries.
#[derive(FromRow)]
struct EvaluationRow {
    id: String,
    submission_id: String,
    jury_id: String,
    creativity: i16,
    technique: i16,
    presentation: i16,
    comment: String,
    created_at: DateTime<Utc>,
}

impl EvaluationRow {
    fn try_into_record(self) -> Result<EvaluationRecord, sqlx::Error> {
        let id = EvaluationId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid evaluation id '{}': {}", self.id, e),
            )))
        })?;
        let submission_id = SubmissionId::from_str(&self.submission_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid submission id '{}': {}", self.submission_id, e),
            )))
        })?;
        let jury_id = AccountId::from_str(&self.jury_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid account id '{}': {}", self.jury_id, e),
            )))
        })?;

        Ok(EvaluationRecord {
            id,
            submission_id,
            jury_id,
            creativity: self.creativity,
            technique: self.technique,
            presentation: self.presentation,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

/// Repository for evaluation operations.
pub struct EvaluationRepository {
    pool: PgPool,
}

impl EvaluationRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists evaluations for a submission, oldest first.
    pub async fn list_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<EvaluationRecord>, sqlx::Error> {
        let rows: Vec<EvaluationRow> = sqlx::query_as(
            r#"
            SELECT id, submission_id, jury_id, creativity, technique, presentation,
                   comment, created_at
            FROM evaluations
            WHERE submission_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(submission_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_record()).collect()
    }

    /// Finds the evaluation a jury member gave a submission, if any.
    pub async fn find_by_submission_and_jury(
        &self,
        submission_id: SubmissionId,
        jury_id: AccountId,
    ) -> Result<Option<EvaluationRecord>, sqlx::Error> {
        let row: Option<EvaluationRow> = sqlx::query_as(
            r#"
            SELECT id, submission_id, jury_id, creativity, technique, presentation,
                   comment, created_at
            FROM evaluations
            WHERE submission_id = $1 AND jury_id = $2
            "#,
        )
        .bind(submission_id.to_string())
        .bind(jury_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_record()?)),
            None => Ok(None),
        }
    }

    /// Creates a new evaluation.
    pub async fn create(&self, evaluation: &EvaluationRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO evaluations
                (id, submission_id, jury_id, creativity, technique, presentation,
                 comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(evaluation.id.to_string())
        .bind(evaluation.submission_id.to_string())
        .bind(evaluation.jury_id.to_string())
        .bind(evaluation.creativity)
        .bind(evaluation.technique)
        .bind(evaluation.presentation)
        .bind(&evaluation.comment)
        .bind(evaluation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_range_bounds() {
        assert!(score_in_range(0));
        assert!(score_in_range(10));
        assert!(!score_in_range(-1));
        assert!(!score_in_range(11));
    }

    #[test]
    fn submission_delete_cascades_to_evaluations() {
        // Withdrawing a submission must also remove its scores rather than
        // fail on the FK.
        let schema = include_str!("../../migrations/0005_evaluations.sql");
        assert!(schema.contains("REFERENCES submissions(id) ON DELETE CASCADE"));
    }

    #[test]
    fn total_sums_the_three_scores() {
        let evaluation = EvaluationRecord::new(
            SubmissionId::new(),
            AccountId::new(),
            8,
            7,
            9,
            "Strong technique".to_string(),
        );
        assert_eq!(evaluation.total(), 24);
    }
}
