//! Postgres-backed identity store.
//!
//! Implements the `IdentityStore` trait from `concours-platform-access` over
//! sqlx. Transport faults map to `StoreError::Unavailable` and undecodable
//! rows to `StoreError::InvalidRecord`, so the resolver can fail closed
//! instead of treating an outage as an unknown credential.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concours_core::AccountId;
use concours_platform_access::{
    Account, AccountStatus, IdentityStore, Role, Session, SessionId, StoreError,
};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for account queries.
#[derive(FromRow)]
struct AccountRow {
    id: String,
    email: String,
    credential_hash: String,
    display_name: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn try_into_account(self) -> Result<Account, StoreError> {
        let id = AccountId::from_str(&self.id).map_err(|e| StoreError::InvalidRecord {
            details: format!("invalid account id '{}': {}", self.id, e),
        })?;
        let role = Role::from_str(&self.role).map_err(|e| StoreError::InvalidRecord {
            details: e.to_string(),
        })?;
        let status =
            AccountStatus::from_str(&self.status).map_err(|e| StoreError::InvalidRecord {
                details: e.to_string(),
            })?;

        Ok(Account::with_all_fields(
            id,
            self.email,
            self.credential_hash,
            self.display_name,
            role,
            status,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    account_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn try_into_session(self) -> Result<Session, StoreError> {
        let account_id =
            AccountId::from_str(&self.account_id).map_err(|e| StoreError::InvalidRecord {
                details: format!("invalid account id '{}': {}", self.account_id, e),
            })?;

        Ok(Session::with_timestamps(
            SessionId::new(self.id),
            account_id,
            self.created_at,
            self.expires_at,
        ))
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable {
        details: err.to_string(),
    }
}

/// Postgres implementation of the identity store.
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Deletes expired sessions, returning how many were removed.
    ///
    /// Not part of the `IdentityStore` trait; only the background cleanup
    /// task uses this.
    pub async fn delete_expired_sessions(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(r) => Ok(Some(r.try_into_session()?)),
            None => Ok(None),
        }
    }

    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, account_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.account_id().to_string())
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, credential_hash, display_name, role, status, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(r) => Ok(Some(r.try_into_account()?)),
            None => Ok(None),
        }
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, credential_hash, display_name, role, status, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(r) => Ok(Some(r.try_into_account()?)),
            None => Ok(None),
        }
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, credential_hash, display_name, role, status, created_at, updated_at
            FROM accounts
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(AccountRow::try_into_account).collect()
    }

    async fn create_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, credential_hash, display_name, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().to_string())
        .bind(account.email())
        .bind(account.credential_hash())
        .bind(account.display_name())
        .bind(account.role().as_str())
        .bind(account.status().as_str())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET display_name = $2, credential_hash = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id().to_string())
        .bind(account.display_name())
        .bind(account.credential_hash())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn update_account_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }
}
