//! Database repository for competitions.

use chrono::{DateTime, Utc};
use concours_core::CompetitionId;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Lifecycle status of a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    /// Announced but not yet open for submissions.
    Upcoming,
    /// Open for submissions.
    Active,
    /// Closed; results are final.
    Completed,
}

impl CompetitionStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompetitionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown competition status: {other}")),
        }
    }
}

/// A competition record from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionRecord {
    /// Competition ID.
    pub id: CompetitionId,
    /// Competition title.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Category (e.g. "pastry", "photography").
    pub category: String,
    /// Lifecycle status.
    pub status: CompetitionStatus,
    /// Total prize pool.
    pub prize_pool: f64,
    /// When submissions open.
    pub start_date: DateTime<Utc>,
    /// When submissions close.
    pub end_date: DateTime<Utc>,
    /// When created.
    pub created_at: DateTime<Utc>,
    /// When last updated.
    pub updated_at: DateTime<Utc>,
}

impl CompetitionRecord {
    /// Creates a new competition record in `Upcoming` status.
    #[must_use]
    pub fn new(
        title: String,
        description: String,
        category: String,
        prize_pool: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CompetitionId::new(),
            title,
            description,
            category,
            status: CompetitionStatus::Upcoming,
            prize_pool,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row type for competition queries.
#[derive(FromRow)]
struct CompetitionRow {
    id: String,
    title: String,
    description: String,
    category: String,
    status: String,
    prize_pool: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompetitionRow {
    fn try_into_record(self) -> Result<CompetitionRecord, sqlx::Error> {
        let id = CompetitionId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid competition id '{}': {}", self.id, e),
            )))
        })?;
        let status = CompetitionStatus::from_str(&self.status).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            )))
        })?;

        Ok(CompetitionRecord {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            status,
            prize_pool: self.prize_pool,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for competition operations.
pub struct CompetitionRepository {
    pool: PgPool,
}

impl CompetitionRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all competitions, most recently created first.
    pub async fn list_all(&self) -> Result<Vec<CompetitionRecord>, sqlx::Error> {
        let rows: Vec<CompetitionRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, category, status, prize_pool,
                   start_date, end_date, created_at, updated_at
            FROM competitions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into_record()).collect()
    }

    /// Finds a competition by ID.
    pub async fn find_by_id(
        &self,
        id: CompetitionId,
    ) -> Result<Option<CompetitionRecord>, sqlx::Error> {
        let row: Option<CompetitionRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, category, status, prize_pool,
                   start_date, end_date, created_at, updated_at
            FROM competitions
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

    /// Creates a new competition.
    pub async fn create(&self, competition: &CompetitionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO competitions
                (id, title, description, category, status, prize_pool,
                 start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(competition.id.to_string())
        .bind(&competition.title)
        .bind(&competition.description)
        .bind(&competition.category)
        .bind(competition.status.as_str())
        .bind(competition.prize_pool)
        .bind(competition.start_date)
        .bind(competition.end_date)
        .bind(competition.created_at)
        .bind(competition.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing competition.
    pub async fn update(&self, competition: &CompetitionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE competitions
            SET title = $2, description = $3, category = $4, status = $5,
                prize_pool = $6, start_date = $7, end_date = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(competition.id.to_string())
        .bind(&competition.title)
        .bind(&competition.description)
        .bind(&competition.category)
        .bind(competition.status.as_str())
        .bind(competition.prize_pool)
        .bind(competition.start_date)
        .bind(competition.end_date)
        .bind(competition.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a competition, returning whether a row was removed.
    pub async fn delete(&self, id: CompetitionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM competitions
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
