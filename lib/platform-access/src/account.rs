//! Account domain type and related structures.
//!
//! An `Account` is the persisted identity record behind a principal.
//! Accounts are created at registration, mutated by admin action (status,
//! role) or by the owner (profile fields), and never hard-deleted: removal
//! is a soft transition to `Suspended`.

use chrono::{DateTime, Utc};
use concours_core::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::role::Role;

/// Lifecycle status of an account.
///
/// Only `Active` accounts may log in or resolve to an authenticated
/// principal. `Pending` is the state between registration and admin
/// approval; `Suspended` is the soft-delete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Registered but not yet approved.
    Pending,
    /// Approved and eligible to authenticate.
    Active,
    /// Disabled by an admin; soft-delete state.
    Suspended,
}

impl AccountStatus {
    /// Returns the lowercase wire/storage name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an account status from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    /// The string that failed to parse.
    pub value: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown account status '{}'", self.value)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for AccountStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(ParseStatusError {
                value: other.to_string(),
            }),
        }
    }
}

/// A registered account on the platform.
///
/// The `credential_hash` is a PHC-format argon2 string; the raw credential
/// never leaves the login handler. Role is immutable by the subject
/// themselves and changes only through admin operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal platform account ID.
    id: AccountId,
    /// Login email; unique across the platform.
    email: String,
    /// PHC-format hash of the login credential.
    credential_hash: String,
    /// Human-readable display name.
    display_name: String,
    /// The account's platform role.
    role: Role,
    /// Lifecycle status gating authentication.
    status: AccountStatus,
    /// When the account record was created.
    created_at: DateTime<Utc>,
    /// When the account record was last updated.
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new candidate account awaiting approval.
    ///
    /// Registration always produces a `Candidate` in `Pending` status;
    /// elevated roles and activation are admin operations.
    #[must_use]
    pub fn register(email: String, credential_hash: String, display_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            email,
            credential_hash,
            display_name,
            role: Role::Candidate,
            status: AccountStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an account with all fields specified.
    ///
    /// Use this when reconstituting an account from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: AccountId,
        email: String,
        credential_hash: String,
        display_name: String,
        role: Role,
        status: AccountStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            credential_hash,
            display_name,
            role,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns the account's internal platform ID.
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the account's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the PHC-format credential hash.
    #[must_use]
    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }

    /// Returns the account's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the account's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the account's lifecycle status.
    #[must_use]
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Returns when the account was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the account was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the account may authenticate.
    #[must_use]
    pub fn can_authenticate(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Sets the account's display name (owner-editable profile field).
    pub fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    /// Replaces the credential hash (password change).
    pub fn set_credential_hash(&mut self, credential_hash: String) {
        self.credential_hash = credential_hash;
        self.updated_at = Utc::now();
    }

    /// Sets the lifecycle status (admin operation).
    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Sets the role (admin operation; never the subject's own).
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account() -> Account {
        Account::register(
            "alice@example.com".to_string(),
            "$argon2id$test".to_string(),
            "Alice".to_string(),
        )
    }

    #[test]
    fn registered_account_is_pending_candidate() {
        let account = test_account();
        assert_eq!(account.role(), Role::Candidate);
        assert_eq!(account.status(), AccountStatus::Pending);
        assert!(!account.can_authenticate());
    }

    #[test]
    fn registered_account_has_generated_id() {
        let account = test_account();
        assert!(account.id().to_string().starts_with("acct_"));
    }

    #[test]
    fn activated_account_can_authenticate() {
        let mut account = test_account();
        account.set_status(AccountStatus::Active);
        assert!(account.can_authenticate());

        account.set_status(AccountStatus::Suspended);
        assert!(!account.can_authenticate());
    }

    #[test]
    fn set_display_name_updates_timestamp() {
        let mut account = test_account();
        let original_updated_at = account.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));
        account.set_display_name("Alice B.".to_string());

        assert_eq!(account.display_name(), "Alice B.");
        assert!(account.updated_at() > original_updated_at);
    }

    #[test]
    fn set_role_updates_role() {
        let mut account = test_account();
        account.set_role(Role::Jury);
        assert_eq!(account.role(), Role::Jury);
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Active,
            AccountStatus::Suspended,
        ] {
            let parsed: AccountStatus = status.as_str().parse().expect("should parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_parse_unknown() {
        let result: Result<AccountStatus, _> = "banned".parse();
        assert!(result.is_err());
    }

    #[test]
    fn with_all_fields_preserves_values() {
        let id = AccountId::new();
        let created = Utc::now() - chrono::Duration::days(30);
        let updated = Utc::now() - chrono::Duration::days(1);

        let account = Account::with_all_fields(
            id,
            "jury@example.com".to_string(),
            "$argon2id$x".to_string(),
            "Jury Member".to_string(),
            Role::Jury,
            AccountStatus::Active,
            created,
            updated,
        );

        assert_eq!(account.id(), id);
        assert_eq!(account.email(), "jury@example.com");
        assert_eq!(account.role(), Role::Jury);
        assert_eq!(account.status(), AccountStatus::Active);
        assert_eq!(account.created_at(), created);
        assert_eq!(account.updated_at(), updated);
    }

    #[test]
    fn account_serialization_roundtrip() {
        let account = test_account();
        let json = serde_json::to_string(&account).expect("serialize");
        let parsed: Account = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(account, parsed);
    }
}
