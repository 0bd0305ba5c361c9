//! The per-request identity attached to every operation.
//!
//! A `Principal` is derived from a resolved session at the start of a request
//! and discarded when the request completes. It carries only the account id
//! and role; handlers and the policy gate never see credentials or sessions.

use concours_core::AccountId;
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The authenticated (or anonymous) identity attached to a request.
///
/// The anonymous variant carries no account id by construction, so the
/// "anonymous principals have no id" invariant cannot be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Principal {
    /// An unauthenticated visitor.
    Anonymous,
    /// An authenticated account.
    Authenticated {
        /// The account this principal was resolved from.
        id: AccountId,
        /// The account's role at resolution time.
        role: Role,
    },
}

impl Principal {
    /// Creates an anonymous principal.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates a principal for an authenticated account.
    ///
    /// `role` must be one of the stored account roles; `Role::Anonymous` is
    /// reserved for the anonymous variant and is never stored on an account.
    #[must_use]
    pub fn authenticated(id: AccountId, role: Role) -> Self {
        Self::Authenticated { id, role }
    }

    /// Returns the principal's role.
    ///
    /// Anonymous principals report `Role::Anonymous`.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Anonymous => Role::Anonymous,
            Self::Authenticated { role, .. } => *role,
        }
    }

    /// Returns the account id, if the principal is authenticated.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    /// Returns true if this principal is anonymous.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns true if this principal has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }
}
