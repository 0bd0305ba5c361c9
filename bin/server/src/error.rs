//! HTTP error mapping for API handlers.
//!
//! Every handler returns `Result<_, ApiError>`. The mapping is deliberately
//! coarse on the wire: policy denials all render as the same generic
//! "Not authorized" body so rule internals are never disclosed, and a
//! resolver outage renders as 503 rather than quietly downgrading the
//! request to anonymous.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use concours_platform_access::{ResolveError, StoreError};
use concours_policy::AccessError;
use rootcause::Report;
use serde::Serialize;
use std::fmt;

/// API-level errors, translated to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The policy gate denied the action, or the caller lacks an account.
    NotAuthorized,
    /// Login credentials did not match an active account's credential.
    InvalidCredentials,
    /// The account exists but is not eligible to sign in.
    AccountNotActive,
    /// The identity store could not answer; the request fails closed.
    StoreUnavailable,
    /// The requested entity does not exist.
    NotFound {
        /// The kind of entity, for the response body.
        entity: &'static str,
    },
    /// The request body failed validation.
    Validation {
        /// User-facing description of the problem.
        message: String,
    },
    /// A storage operation failed.
    Database {
        /// Internal details, logged but never sent to the client.
        details: String,
    },
}

impl ApiError {
    /// Creates a not-found error for the given entity kind.
    #[must_use]
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Creates a validation error with a user-facing message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthorized => write!(f, "not authorized"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::AccountNotActive => write!(f, "account not active"),
            Self::StoreUnavailable => write!(f, "identity store unavailable"),
            Self::NotFound { entity } => write!(f, "{entity} not found"),
            Self::Validation { message } => write!(f, "validation failed: {message}"),
            Self::Database { details } => write!(f, "database error: {details}"),
        }
    }
}

/// Uniform JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotAuthorized => (StatusCode::FORBIDDEN, "Not authorized".to_string()),
            Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            Self::AccountNotActive => {
                (StatusCode::FORBIDDEN, "Account is not active".to_string())
            }
            Self::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable".to_string(),
            ),
            Self::NotFound { entity } => (StatusCode::NOT_FOUND, format!("{entity} not found")),
            Self::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Database { details } => {
                tracing::error!(details = %details, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<Report<AccessError>> for ApiError {
    fn from(report: Report<AccessError>) -> Self {
        // The report names the rule that denied; keep that server-side.
        tracing::debug!(denied = %report, "request denied by policy");
        Self::NotAuthorized
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        tracing::warn!(error = %err, "principal resolution failed");
        Self::StoreUnavailable
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { details } => {
                tracing::warn!(details = %details, "identity store unavailable");
                Self::StoreUnavailable
            }
            StoreError::InvalidRecord { details } => Self::Database { details },
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_maps_to_generic_forbidden() {
        let report: Report<AccessError> = AccessError::Denied {
            resource: "submission".to_string(),
            action: "update".to_string(),
        }
        .into();
        let api_err = ApiError::from(report);
        assert!(matches!(api_err, ApiError::NotAuthorized));
    }

    #[test]
    fn resolve_outage_maps_to_store_unavailable() {
        let err = ResolveError::StoreUnavailable {
            details: "connection refused".to_string(),
        };
        assert!(matches!(ApiError::from(err), ApiError::StoreUnavailable));
    }

    #[test]
    fn store_outage_maps_to_store_unavailable() {
        let err = StoreError::Unavailable {
            details: "timeout".to_string(),
        };
        assert!(matches!(ApiError::from(err), ApiError::StoreUnavailable));
    }

    #[test]
    fn display_does_not_panic() {
        let err = ApiError::not_found("competition");
        assert!(err.to_string().contains("competition"));
    }
}
