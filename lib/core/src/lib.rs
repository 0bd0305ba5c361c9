//! Core domain types and utilities for the concours platform.
//!
//! This crate provides the foundational types, error handling, and shared
//! utilities used throughout the concours design-competition platform.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AccountId, CompetitionId, EvaluationId, ParseIdError, SubmissionId};
