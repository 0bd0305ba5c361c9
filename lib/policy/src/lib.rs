//! Centralized authorization policy for the concours platform.
//!
//! This crate is the single place where "who may do what" is defined. It
//! provides:
//! - The authorization vocabulary (`ResourceType`, `Action`, `Decision`,
//!   `ResourceSnapshot`)
//! - The declarative rule table (`PolicyRule`, `PolicyTable`)
//! - The gate (`Gate`) every resource handler consults before mutating
//!
//! # Design
//!
//! The gate is fail-closed: a (resource type, action) pair with no rule in
//! the table denies for everyone, including admins. Role membership and the
//! owner override are independent conditions, OR'd together. Decisions are
//! pure and deterministic, so the gate needs no locking and can be shared
//! freely across request tasks.
//!
//! # Example
//!
//! ```
//! use concours_core::AccountId;
//! use concours_platform_access::{Principal, Role};
//! use concours_policy::{Action, Decision, Gate, ResourceSnapshot, ResourceType};
//!
//! let gate = Gate::platform_default();
//!
//! // Anonymous visitors may browse competitions.
//! let decision = gate.decide(
//!     &Principal::anonymous(),
//!     ResourceType::Competition,
//!     Action::Read,
//!     None,
//! );
//! assert_eq!(decision, Decision::Allow);
//!
//! // A candidate may edit their own submission, but not someone else's.
//! let me = AccountId::new();
//! let candidate = Principal::authenticated(me, Role::Candidate);
//! let mine = ResourceSnapshot::owned_by(me);
//! assert!(gate
//!     .decide(&candidate, ResourceType::Submission, Action::Update, Some(&mine))
//!     .is_allow());
//! ```

pub mod error;
pub mod gate;
pub mod table;
pub mod types;

// Re-export main types at crate root
pub use error::AccessError;
pub use gate::Gate;
pub use table::{PolicyRule, PolicyTable};
pub use types::{Action, Decision, ResourceSnapshot, ResourceType};
