//! Authorization error types.

use std::fmt;

/// Errors from authorization checks.
///
/// A plain deny from the gate is a normal `Decision`, not an error; this
/// type exists for the `require` convenience path where handlers want a
/// propagatable failure. The resource and action are kept for server-side
/// logging only and must never reach API responses.
#[derive(Debug)]
pub enum AccessError {
    /// The policy gate denied the action.
    Denied {
        /// The resource type that was requested.
        resource: String,
        /// The action that was requested.
        action: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied { resource, action } => {
                write!(f, "action '{action}' denied on resource '{resource}'")
            }
        }
    }
}

impl std::error::Error for AccessError {}
