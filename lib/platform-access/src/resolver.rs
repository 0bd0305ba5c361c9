//! Session/principal resolution.
//!
//! Converts the opaque credential attached to a request (session cookie or
//! bearer token value) into a [`Principal`]. Resolution is a pure lookup
//! plus a time-bound validity check: it never mutates account state, and it
//! never fails for a bad credential.
//!
//! Degradation rules, in order:
//! - missing, malformed, unknown, or expired credential: anonymous
//! - session valid but account missing, pending, or suspended: anonymous
//! - identity store unreachable: [`ResolveError::StoreUnavailable`], which
//!   callers must translate to a hard failure, never to anonymous access

use std::sync::Arc;
use tracing::debug;

use crate::error::{ResolveError, StoreError};
use crate::principal::Principal;
use crate::session::SessionId;
use crate::store::IdentityStore;

/// Resolves request credentials into principals.
///
/// Cheap to clone; holds only a shared handle to the identity store.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn IdentityStore>,
}

impl PrincipalResolver {
    /// Creates a resolver backed by the given identity store.
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying identity store handle.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// Resolves an optional opaque credential into a principal.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::StoreUnavailable` only when the identity store
    /// cannot answer. Every other outcome, including invalid and expired
    /// credentials, is the anonymous principal.
    pub async fn resolve(&self, credential: Option<&str>) -> Result<Principal, ResolveError> {
        let Some(credential) = credential else {
            return Ok(Principal::anonymous());
        };

        let credential = credential.trim();
        if credential.is_empty() {
            return Ok(Principal::anonymous());
        }

        let session_id = SessionId::from(credential);
        let session = match self.store.find_session(&session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("no session for presented credential");
                return Ok(Principal::anonymous());
            }
            Err(e) => return Err(ResolveError::from(e)),
        };

        if session.is_expired() {
            debug!(session_id = %session_id, "session expired");
            // Best-effort cleanup; a failure here does not change the outcome.
            if let Err(e) = self.store.delete_session(&session_id).await {
                self.log_cleanup_failure(&e);
            }
            return Ok(Principal::anonymous());
        }

        let account = match self.store.find_account(session.account_id()).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!(account_id = %session.account_id(), "session refers to missing account");
                return Ok(Principal::anonymous());
            }
            Err(e) => return Err(ResolveError::from(e)),
        };

        if !account.can_authenticate() {
            debug!(
                account_id = %account.id(),
                status = %account.status(),
                "account not eligible to authenticate"
            );
            return Ok(Principal::anonymous());
        }

        Ok(Principal::authenticated(account.id(), account.role()))
    }

    fn log_cleanup_failure(&self, err: &StoreError) {
        tracing::warn!(error = %err, "failed to delete expired session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountStatus};
    use crate::role::Role;
    use crate::session::Session;
    use async_trait::async_trait;
    use chrono::Duration;
    use concours_core::AccountId;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory identity store for resolver tests.
    #[derive(Default)]
    struct FakeStore {
        sessions: Mutex<HashMap<String, Session>>,
        accounts: Mutex<HashMap<AccountId, Account>>,
        unavailable: bool,
    }

    impl FakeStore {
        fn unreachable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        fn insert_account(&self, account: Account) {
            self.accounts
                .lock()
                .expect("lock")
                .insert(account.id(), account);
        }

        fn insert_session(&self, session: Session) {
            self.sessions
                .lock()
                .expect("lock")
                .insert(session.id().as_str().to_string(), session);
        }

        fn check_available(&self) -> Result<(), StoreError> {
            if self.unavailable {
                Err(StoreError::Unavailable {
                    details: "store offline".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl IdentityStore for FakeStore {
        async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
            self.check_available()?;
            Ok(self.sessions.lock().expect("lock").get(id.as_str()).cloned())
        }

        async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
            self.check_available()?;
            self.insert_session(session.clone());
            Ok(())
        }

        async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
            self.check_available()?;
            self.sessions.lock().expect("lock").remove(id.as_str());
            Ok(())
        }

        async fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
            self.check_available()?;
            Ok(self.accounts.lock().expect("lock").get(&id).cloned())
        }

        async fn find_account_by_email(
            &self,
            email: &str,
        ) -> Result<Option<Account>, StoreError> {
            self.check_available()?;
            Ok(self
                .accounts
                .lock()
                .expect("lock")
                .values()
                .find(|a| a.email() == email)
                .cloned())
        }

        async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
            self.check_available()?;
            Ok(self.accounts.lock().expect("lock").values().cloned().collect())
        }

        async fn create_account(&self, account: &Account) -> Result<(), StoreError> {
            self.check_available()?;
            self.insert_account(account.clone());
            Ok(())
        }

        async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
            self.check_available()?;
            self.insert_account(account.clone());
            Ok(())
        }

        async fn update_account_status(
            &self,
            id: AccountId,
            status: AccountStatus,
        ) -> Result<(), StoreError> {
            self.check_available()?;
            if let Some(account) = self.accounts.lock().expect("lock").get_mut(&id) {
                account.set_status(status);
            }
            Ok(())
        }
    }

    fn account_with(role: Role, status: AccountStatus) -> Account {
        let mut account = Account::register(
            format!("{}@example.com", role.as_str()),
            "$argon2id$test".to_string(),
            "Test".to_string(),
        );
        account.set_role(role);
        account.set_status(status);
        account
    }

    fn resolver_with(store: FakeStore) -> PrincipalResolver {
        PrincipalResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn missing_credential_resolves_anonymous() {
        let resolver = resolver_with(FakeStore::default());
        let principal = resolver.resolve(None).await.expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn blank_credential_resolves_anonymous() {
        let resolver = resolver_with(FakeStore::default());
        let principal = resolver.resolve(Some("   ")).await.expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn unknown_credential_resolves_anonymous() {
        let resolver = resolver_with(FakeStore::default());
        let principal = resolver
            .resolve(Some("no-such-session"))
            .await
            .expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn valid_session_resolves_account_principal() {
        let store = FakeStore::default();
        let account = account_with(Role::Candidate, AccountStatus::Active);
        let session = Session::new(SessionId::generate(), account.id(), Duration::hours(1));
        let credential = session.id().as_str().to_string();
        store.insert_account(account.clone());
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");

        assert_eq!(principal.account_id(), Some(account.id()));
        assert_eq!(principal.role(), Role::Candidate);
    }

    #[tokio::test]
    async fn expired_session_resolves_anonymous_and_is_deleted() {
        let store = FakeStore::default();
        let account = account_with(Role::Candidate, AccountStatus::Active);
        let session = Session::new(SessionId::generate(), account.id(), Duration::seconds(-1));
        let credential = session.id().as_str().to_string();
        store.insert_account(account);
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(principal.is_anonymous());

        // The expired session was cleaned up, so a second resolve takes the
        // unknown-credential path.
        let again = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(again.is_anonymous());
        let found = resolver
            .store()
            .find_session(&SessionId::from(credential.as_str()))
            .await
            .expect("store reachable");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn suspended_account_resolves_anonymous() {
        let store = FakeStore::default();
        let account = account_with(Role::Jury, AccountStatus::Suspended);
        let session = Session::new(SessionId::generate(), account.id(), Duration::hours(1));
        let credential = session.id().as_str().to_string();
        store.insert_account(account);
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(principal.is_anonymous());
        assert_eq!(principal.role(), Role::Anonymous);
    }

    #[tokio::test]
    async fn pending_account_resolves_anonymous() {
        let store = FakeStore::default();
        let account = account_with(Role::Candidate, AccountStatus::Pending);
        let session = Session::new(SessionId::generate(), account.id(), Duration::hours(1));
        let credential = session.id().as_str().to_string();
        store.insert_account(account);
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn session_without_account_resolves_anonymous() {
        let store = FakeStore::default();
        let session = Session::new(SessionId::generate(), AccountId::new(), Duration::hours(1));
        let credential = session.id().as_str().to_string();
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn store_outage_is_an_error_not_anonymous() {
        let resolver = resolver_with(FakeStore::unreachable());
        let result = resolver.resolve(Some("some-session-id")).await;
        let err = result.expect_err("should fail closed");
        assert!(matches!(err, ResolveError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn store_outage_without_credential_still_resolves_anonymous() {
        // No credential means no store lookup, so the outage is invisible.
        let resolver = resolver_with(FakeStore::unreachable());
        let principal = resolver.resolve(None).await.expect("resolve");
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn admin_role_carried_through_resolution() {
        let store = FakeStore::default();
        let account = account_with(Role::Admin, AccountStatus::Active);
        let session = Session::new(SessionId::generate(), account.id(), Duration::hours(1));
        let credential = session.id().as_str().to_string();
        store.insert_account(account.clone());
        store.insert_session(session);

        let resolver = resolver_with(store);
        let principal = resolver.resolve(Some(&credential)).await.expect("resolve");
        assert!(principal.is_admin());
        assert_eq!(principal.account_id(), Some(account.id()));
    }
}
