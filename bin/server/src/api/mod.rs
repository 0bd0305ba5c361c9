//! REST API handlers.
//!
//! Every handler follows the same shape: resolve the principal (done by the
//! `ResolvedPrincipal` extractor), load the resource if the action targets
//! an existing one, ask the policy gate, then perform the operation. No
//! handler inspects roles directly.

pub mod competitions;
pub mod evaluations;
pub mod submissions;
pub mod users;
