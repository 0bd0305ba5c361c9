//! Authorization vocabulary: resource types, actions, and decisions.

use concours_core::{AccountId, CompetitionId, SubmissionId};
use std::fmt;

/// Resource types under access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A competition.
    Competition,
    /// A submission entered into a competition.
    Submission,
    /// An account record (profile, status).
    UserRecord,
    /// A jury evaluation of a submission.
    Evaluation,
}

impl ResourceType {
    /// Returns the stable policy-table name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Competition => "competition",
            Self::Submission => "submission",
            Self::UserRecord => "user-record",
            Self::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions a principal can request on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read a resource or listing.
    Read,
    /// Create a new resource.
    Create,
    /// Update an existing resource.
    Update,
    /// Delete an existing resource.
    Delete,
    /// Read one's own account record.
    ReadOwn,
    /// Read any account record.
    ReadAny,
    /// Transition an account's lifecycle status.
    UpdateStatus,
    /// Update one's own profile fields.
    UpdateOwnProfile,
}

impl Action {
    /// Returns the stable policy-table name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ReadOwn => "read-own",
            Self::ReadAny => "read-any",
            Self::UpdateStatus => "update-status",
            Self::UpdateOwnProfile => "update-own-profile",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a policy decision.
///
/// `Deny` is a normal return value, not an error: handlers translate it to a
/// uniform "not authorized" failure without leaking rule internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action is permitted.
    Allow,
    /// The action is not permitted.
    Deny,
}

impl Decision {
    /// Returns true if the decision permits the action.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The authorization view of an existing resource.
///
/// Only ownership matters to the gate; handlers build a snapshot from the
/// stored record before asking for a decision. Create actions have no
/// existing resource and pass `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSnapshot {
    owner_id: Option<AccountId>,
}

impl ResourceSnapshot {
    /// Creates a snapshot of a resource owned by the given account.
    #[must_use]
    pub fn owned_by(owner_id: AccountId) -> Self {
        Self {
            owner_id: Some(owner_id),
        }
    }

    /// Creates a snapshot of a resource with no owner.
    #[must_use]
    pub fn unowned() -> Self {
        Self { owner_id: None }
    }

    /// Creates a snapshot of a competition.
    ///
    /// Competitions are platform-owned: no account gets an owner override on
    /// them, so the snapshot is unowned regardless of who created the row.
    #[must_use]
    pub fn competition(_id: CompetitionId) -> Self {
        Self::unowned()
    }

    /// Creates a snapshot of a submission owned by the entering candidate.
    #[must_use]
    pub fn submission(_id: SubmissionId, owner_id: AccountId) -> Self {
        Self::owned_by(owner_id)
    }

    /// Creates a snapshot of an account record, owned by the account itself.
    #[must_use]
    pub fn user_record(account_id: AccountId) -> Self {
        Self::owned_by(account_id)
    }

    /// Returns the owning account, if any.
    #[must_use]
    pub fn owner_id(&self) -> Option<AccountId> {
        self.owner_id
    }
}
