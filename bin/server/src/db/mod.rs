//! Database repositories for competition platform data.
//!
//! Each repository wraps the shared `PgPool` and exposes typed operations
//! over one table. Ownership lives in the rows themselves (`candidate_id`
//! on submissions); the policy gate reads it through a resource snapshot
//! when deciding owner overrides.

pub mod competition;
pub mod evaluation;
pub mod submission;

pub use competition::{CompetitionRecord, CompetitionRepository, CompetitionStatus};
pub use evaluation::{EvaluationRecord, EvaluationRepository};
pub use submission::{SubmissionRecord, SubmissionRepository, SubmissionStatus};
