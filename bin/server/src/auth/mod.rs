//! Authentication module for the concours server.
//!
//! This module provides:
//! - Password-based login with database-backed session management
//! - The Postgres `IdentityStore` implementation
//! - The principal extractor that attaches an identity to every request
//!
//! # Authorization Model
//!
//! Authentication here only establishes *who* is asking. *What* they may do
//! is decided exclusively by the policy gate (`concours_policy::Gate`): no
//! route handler checks roles inline. The extractor degrades bad and
//! expired credentials to the anonymous principal; only an identity store
//! outage is an error, and it fails the request closed with 503.

pub mod middleware;
pub mod routes;
pub mod store;

pub use middleware::ResolvedPrincipal;
pub use routes::{login, logout, register};
pub use store::PgIdentityStore;

use crate::config::SessionConfig;
use concours_platform_access::{IdentityStore, PrincipalResolver};
use concours_policy::Gate;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
    /// Identity store used by auth routes and user handlers.
    pub identity: Arc<dyn IdentityStore>,
    /// Resolver turning request credentials into principals.
    pub resolver: PrincipalResolver,
    /// The authorization policy gate.
    pub gate: Gate,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates application state over a database pool.
    ///
    /// The identity store, resolver, and gate are all derived here so every
    /// handler shares the same policy table and store handle.
    pub fn new(db_pool: PgPool, session_config: SessionConfig) -> Self {
        let identity: Arc<dyn IdentityStore> = Arc::new(PgIdentityStore::new(db_pool.clone()));
        let resolver = PrincipalResolver::new(identity.clone());
        Self {
            db_pool,
            identity,
            resolver,
            gate: Gate::platform_default(),
            session_config,
        }
    }
}
