//! Error types for the platform-access crate.
//!
//! The taxonomy deliberately separates "the answer is no" from "we could not
//! get an answer": a bad or expired credential degrades to the anonymous
//! principal and is never an error, while an unreachable identity store is
//! surfaced as `ResolveError::StoreUnavailable` so callers fail closed
//! instead of treating the request as anonymous.

use std::fmt;

/// Errors from identity store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the operation failed in transit.
    Unavailable {
        /// Error details.
        details: String,
    },
    /// A stored record could not be decoded into its domain type.
    InvalidRecord {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { details } => {
                write!(f, "identity store unavailable: {details}")
            }
            Self::InvalidRecord { details } => {
                write!(f, "invalid identity store record: {details}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from principal resolution.
///
/// Resolution never fails for a bad credential; the only failure mode is the
/// identity store being unable to answer at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The identity store could not be consulted. Callers must treat this as
    /// "deny all non-public actions", never as an implicit allow.
    StoreUnavailable {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreUnavailable { details } => {
                write!(f, "principal resolution failed, store unavailable: {details}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        // An undecodable record is also "cannot tell": fail closed.
        Self::StoreUnavailable {
            details: err.to_string(),
        }
    }
}

/// Errors from credential hashing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Hashing the credential failed.
    HashingFailed {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashingFailed { details } => {
                write!(f, "credential hashing failed: {details}")
            }
        }
    }
}

impl std::error::Error for CredentialError {}
