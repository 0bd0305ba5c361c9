//! The identity store abstraction.
//!
//! The resolver and the auth handlers talk to persistence through this trait
//! so they can be tested against an in-memory fake. The server crate
//! provides the Postgres implementation.

use async_trait::async_trait;
use concours_core::AccountId;

use crate::account::{Account, AccountStatus};
use crate::error::StoreError;
use crate::session::{Session, SessionId};

/// Persistence operations the platform-access layer depends on.
///
/// Implementations must map transport faults to `StoreError::Unavailable`
/// rather than panicking or inventing empty results: the resolver relies on
/// the distinction between "not found" and "could not ask".
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks up a session by ID.
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Stores a new session.
    async fn create_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Deletes a session (logout, or opportunistic expiry cleanup).
    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Looks up an account by its internal ID.
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Looks up an account by email (login).
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts (admin view).
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Stores a new account.
    async fn create_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Updates an account's owner-editable profile fields.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Transitions an account's lifecycle status (admin operation).
    ///
    /// Accounts are never hard-deleted; suspension is the removal path.
    async fn update_account_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<(), StoreError>;
}
