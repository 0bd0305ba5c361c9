//! Router assembly.

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::{self, AppState};

/// Builds the application router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        // Competitions
        .route(
            "/api/competitions",
            get(api::competitions::list).post(api::competitions::create),
        )
        .route(
            "/api/competitions/{id}",
            get(api::competitions::get)
                .put(api::competitions::update)
                .delete(api::competitions::delete),
        )
        // Submissions
        .route(
            "/api/submissions/competition/{competition_id}",
            get(api::submissions::list_by_competition),
        )
        .route("/api/submissions", post(api::submissions::create))
        .route(
            "/api/submissions/{id}",
            put(api::submissions::update).delete(api::submissions::delete),
        )
        // Account records
        .route(
            "/api/users/me",
            get(api::users::get_me).patch(api::users::update_me),
        )
        .route("/api/users", get(api::users::list))
        .route("/api/users/{id}", get(api::users::get))
        .route("/api/users/{id}/status", patch(api::users::update_status))
        // Evaluations
        .route("/api/evaluations", post(api::evaluations::create))
        .route(
            "/api/evaluations/submission/{id}",
            get(api::evaluations::list_by_submission),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
