//! Platform access, authentication, and principal resolution for concours.
//!
//! This crate provides:
//! - Account management (`Account`, `AccountStatus`)
//! - Roles (`Role`) and the per-request `Principal`
//! - Session management (`Session`, `SessionId`)
//! - The `IdentityStore` trait the server's persistence layer implements
//! - The `PrincipalResolver` turning opaque credentials into principals
//! - Credential hashing (`hash_credential`, `verify_credential`)
//!
//! # Access Control Model
//!
//! Every request is resolved to a `Principal` before any handler runs. A
//! principal is either anonymous or carries an account id and role; the
//! policy gate (the `concours-policy` crate) decides what that principal may
//! do. Suspended and pending accounts resolve to anonymous even when their
//! session is otherwise valid, so revocation takes effect immediately.
//!
//! # Example
//!
//! ```
//! use concours_platform_access::{Account, AccountStatus, Principal, Role};
//!
//! // Registration always produces a pending candidate.
//! let mut account = Account::register(
//!     "alice@example.com".to_string(),
//!     concours_platform_access::hash_credential("s3cret").unwrap(),
//!     "Alice".to_string(),
//! );
//! assert!(!account.can_authenticate());
//!
//! // Admin approval activates the account.
//! account.set_status(AccountStatus::Active);
//! assert!(account.can_authenticate());
//!
//! let principal = Principal::authenticated(account.id(), account.role());
//! assert_eq!(principal.role(), Role::Candidate);
//! ```

pub mod account;
pub mod credential;
pub mod error;
pub mod principal;
pub mod resolver;
pub mod role;
pub mod session;
pub mod store;

// Re-export main types at crate root
pub use account::{Account, AccountStatus, ParseStatusError};
pub use credential::{hash_credential, verify_credential};
pub use error::{CredentialError, ResolveError, StoreError};
pub use principal::Principal;
pub use resolver::PrincipalResolver;
pub use role::{ParseRoleError, Role};
pub use session::{Session, SessionId};
pub use store::IdentityStore;
