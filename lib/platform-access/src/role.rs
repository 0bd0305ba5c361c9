//! Role types for platform access control.
//!
//! Every request acts under exactly one role. Authenticated accounts carry
//! one of `Admin`, `Jury`, or `Candidate`; requests without a resolvable
//! session act as `Anonymous`. Roles are assigned by admins and are never
//! mutable by the account holder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role attached to a principal.
///
/// `Anonymous` is a real role, not an error state: public read rules list it
/// explicitly in their allowed-role sets. It is never stored on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator: runs competitions and manages accounts.
    Admin,
    /// Jury member: evaluates submissions.
    Jury,
    /// Candidate: enters submissions into competitions.
    Candidate,
    /// Unauthenticated visitor.
    Anonymous,
}

impl Role {
    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role belongs to an authenticated account.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Returns the lowercase wire/storage name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Jury => "jury",
            Self::Candidate => "candidate",
            Self::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a role from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The string that failed to parse.
    pub value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.value)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "jury" => Ok(Self::Jury),
            "candidate" => Ok(Self::Candidate),
            "anonymous" => Ok(Self::Anonymous),
            other => Err(ParseRoleError {
                value: other.to_string(),
            }),
        }
    }
}
