//! Principal extraction for Axum handlers.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use concours_platform_access::Principal;
use std::sync::Arc;

use super::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Extractor resolving the request's credential into a [`Principal`].
///
/// The credential is taken from the `session` cookie or, failing that, from
/// an `Authorization: Bearer` header. A missing or invalid credential is
/// not an error: the handler receives the anonymous principal and the
/// policy gate decides what that principal may do. Only an identity store
/// outage rejects the request, with 503.
pub struct ResolvedPrincipal(pub Principal);

impl<S> FromRequestParts<S> for ResolvedPrincipal
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| PrincipalRejection::InternalError)?;

        let credential = credential_from_parts(&jar, parts);

        let principal = app_state
            .resolver
            .resolve(credential.as_deref())
            .await
            .map_err(|_| PrincipalRejection::StoreUnavailable)?;

        Ok(ResolvedPrincipal(principal))
    }
}

/// Extracts the opaque credential from the cookie jar or bearer header.
fn credential_from_parts(jar: &CookieJar, parts: &Parts) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Rejection type for the principal extractor.
#[derive(Debug)]
pub enum PrincipalRejection {
    /// The identity store could not be consulted; fail closed.
    StoreUnavailable,
    /// Request parts could not be read.
    InternalError,
}

impl IntoResponse for PrincipalRejection {
    fn into_response(self) -> Response {
        match self {
            Self::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
            )
                .into_response(),
            Self::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
