//! Concours server library.
//!
//! The binary in `main.rs` wires configuration, the database pool, and the
//! background session cleanup task around the router defined here.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod types;
