//! The single authorization decision point.
//!
//! Handlers never check roles inline; they ask the gate. The gate is a pure
//! function of (principal, rule table, resource snapshot): no storage
//! access, no clock, no mutation, identical inputs always produce identical
//! decisions. That purity is what makes it safe to call from any number of
//! request tasks without coordination.

use concours_core::Result;
use concours_platform_access::Principal;
use tracing::debug;

use crate::error::AccessError;
use crate::table::PolicyTable;
use crate::types::{Action, Decision, ResourceSnapshot, ResourceType};

/// The access control gate.
///
/// Constructed once at startup from an immutable [`PolicyTable`] and shared
/// across all request handlers.
#[derive(Debug, Clone)]
pub struct Gate {
    table: PolicyTable,
}

impl Gate {
    /// Creates a gate over the given rule table.
    #[must_use]
    pub fn new(table: PolicyTable) -> Self {
        Self { table }
    }

    /// Creates a gate over the platform's standard rule table.
    #[must_use]
    pub fn platform_default() -> Self {
        Self::new(PolicyTable::platform_default())
    }

    /// Decides whether a principal may perform an action on a resource.
    ///
    /// `resource` is `None` for create actions, where there is no existing
    /// owner to consult; the owner override is then inapplicable and only
    /// role membership counts. Role membership and ownership are evaluated
    /// independently and OR'd: either is sufficient.
    ///
    /// A missing rule denies for every principal, admins included
    /// (fail-closed).
    #[must_use]
    pub fn decide(
        &self,
        principal: &Principal,
        resource_type: ResourceType,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> Decision {
        let Some(rule) = self.table.rule(resource_type, action) else {
            return Decision::Deny;
        };

        if rule.allows_role(principal.role()) {
            return Decision::Allow;
        }

        if rule.owner_override {
            if let (Some(account_id), Some(snapshot)) = (principal.account_id(), resource) {
                if snapshot.owner_id() == Some(account_id) {
                    return Decision::Allow;
                }
            }
        }

        Decision::Deny
    }

    /// Checks a decision and returns an error on deny.
    ///
    /// The error carries the resource and action for server-side logging;
    /// the HTTP layer renders it as a uniform "not authorized" response.
    pub fn require(
        &self,
        principal: &Principal,
        resource_type: ResourceType,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> Result<(), AccessError> {
        match self.decide(principal, resource_type, action, resource) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                debug!(
                    role = %principal.role(),
                    resource = %resource_type,
                    action = %action,
                    "policy denied action"
                );
                Err(AccessError::Denied {
                    resource: resource_type.to_string(),
                    action: action.to_string(),
                }
                .into())
            }
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::platform_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concours_core::AccountId;
    use concours_platform_access::Role;

    fn gate() -> Gate {
        Gate::platform_default()
    }

    fn principal(role: Role) -> Principal {
        Principal::authenticated(AccountId::new(), role)
    }

    #[test]
    fn anonymous_may_read_competitions() {
        let decision = gate().decide(
            &Principal::anonymous(),
            ResourceType::Competition,
            Action::Read,
            None,
        );
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn anonymous_may_read_submissions() {
        let decision = gate().decide(
            &Principal::anonymous(),
            ResourceType::Submission,
            Action::Read,
            None,
        );
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn anonymous_may_not_create_anything() {
        let gate = gate();
        let anon = Principal::anonymous();
        for resource_type in [
            ResourceType::Competition,
            ResourceType::Submission,
            ResourceType::Evaluation,
        ] {
            assert_eq!(
                gate.decide(&anon, resource_type, Action::Create, None),
                Decision::Deny,
                "{resource_type}"
            );
        }
    }

    #[test]
    fn only_admin_creates_competitions() {
        let gate = gate();
        assert_eq!(
            gate.decide(
                &principal(Role::Admin),
                ResourceType::Competition,
                Action::Create,
                None
            ),
            Decision::Allow
        );
        for role in [Role::Jury, Role::Candidate] {
            assert_eq!(
                gate.decide(
                    &principal(role),
                    ResourceType::Competition,
                    Action::Create,
                    None
                ),
                Decision::Deny,
                "{role}"
            );
        }
    }

    #[test]
    fn candidate_creates_submissions_jury_does_not() {
        let gate = gate();
        assert_eq!(
            gate.decide(
                &principal(Role::Candidate),
                ResourceType::Submission,
                Action::Create,
                None
            ),
            Decision::Allow
        );
        assert_eq!(
            gate.decide(
                &principal(Role::Jury),
                ResourceType::Submission,
                Action::Create,
                None
            ),
            Decision::Deny
        );
    }

    #[test]
    fn candidate_updates_own_submission() {
        let gate = gate();
        let owner = AccountId::new();
        let candidate = Principal::authenticated(owner, Role::Candidate);
        let snapshot = ResourceSnapshot::owned_by(owner);

        assert_eq!(
            gate.decide(
                &candidate,
                ResourceType::Submission,
                Action::Update,
                Some(&snapshot)
            ),
            Decision::Allow
        );
    }

    #[test]
    fn candidate_cannot_update_anothers_submission() {
        let gate = gate();
        let candidate = Principal::authenticated(AccountId::new(), Role::Candidate);
        let snapshot = ResourceSnapshot::owned_by(AccountId::new());

        assert_eq!(
            gate.decide(
                &candidate,
                ResourceType::Submission,
                Action::Update,
                Some(&snapshot)
            ),
            Decision::Deny
        );
    }

    #[test]
    fn admin_updates_any_submission_regardless_of_owner() {
        let gate = gate();
        let admin = principal(Role::Admin);
        let snapshot = ResourceSnapshot::owned_by(AccountId::new());

        assert_eq!(
            gate.decide(
                &admin,
                ResourceType::Submission,
                Action::Update,
                Some(&snapshot)
            ),
            Decision::Allow
        );
        assert_eq!(
            gate.decide(&admin, ResourceType::Submission, Action::Delete, None),
            Decision::Allow
        );
    }

    #[test]
    fn owner_override_inapplicable_without_resource() {
        // Create-style call: no snapshot, so ownership cannot rescue a
        // role that isn't in the allowed set.
        let gate = gate();
        let candidate = principal(Role::Candidate);
        assert_eq!(
            gate.decide(&candidate, ResourceType::Submission, Action::Update, None),
            Decision::Deny
        );
    }

    #[test]
    fn missing_rule_denies_everyone() {
        let gate = gate();
        let snapshot = ResourceSnapshot::user_record(AccountId::new());
        for role in [Role::Admin, Role::Jury, Role::Candidate, Role::Anonymous] {
            let p = if role == Role::Anonymous {
                Principal::anonymous()
            } else {
                principal(role)
            };
            assert_eq!(
                gate.decide(&p, ResourceType::UserRecord, Action::Delete, Some(&snapshot)),
                Decision::Deny,
                "{role}"
            );
        }
    }

    #[test]
    fn empty_table_denies_everything() {
        let gate = Gate::new(PolicyTable::new());
        assert_eq!(
            gate.decide(
                &principal(Role::Admin),
                ResourceType::Competition,
                Action::Read,
                None
            ),
            Decision::Deny
        );
    }

    #[test]
    fn member_reads_own_user_record() {
        let gate = gate();
        let id = AccountId::new();
        let own = ResourceSnapshot::user_record(id);
        for role in [Role::Admin, Role::Jury, Role::Candidate] {
            let p = Principal::authenticated(id, role);
            assert_eq!(
                gate.decide(&p, ResourceType::UserRecord, Action::ReadOwn, Some(&own)),
                Decision::Allow,
                "{role}"
            );
        }
    }

    #[test]
    fn only_admin_reads_any_user_record() {
        let gate = gate();
        let other = ResourceSnapshot::user_record(AccountId::new());
        assert_eq!(
            gate.decide(
                &principal(Role::Admin),
                ResourceType::UserRecord,
                Action::ReadAny,
                Some(&other)
            ),
            Decision::Allow
        );
        assert_eq!(
            gate.decide(
                &principal(Role::Candidate),
                ResourceType::UserRecord,
                Action::ReadAny,
                Some(&other)
            ),
            Decision::Deny
        );
    }

    #[test]
    fn only_admin_updates_status() {
        let gate = gate();
        let id = AccountId::new();
        // Even on one's own record, status changes are admin-only: the rule
        // carries no owner override.
        let own = ResourceSnapshot::user_record(id);
        let candidate = Principal::authenticated(id, Role::Candidate);
        assert_eq!(
            gate.decide(
                &candidate,
                ResourceType::UserRecord,
                Action::UpdateStatus,
                Some(&own)
            ),
            Decision::Deny
        );
        assert_eq!(
            gate.decide(
                &principal(Role::Admin),
                ResourceType::UserRecord,
                Action::UpdateStatus,
                Some(&own)
            ),
            Decision::Allow
        );
    }

    #[test]
    fn jury_creates_evaluations() {
        let gate = gate();
        assert_eq!(
            gate.decide(
                &principal(Role::Jury),
                ResourceType::Evaluation,
                Action::Create,
                None
            ),
            Decision::Allow
        );
        assert_eq!(
            gate.decide(
                &principal(Role::Candidate),
                ResourceType::Evaluation,
                Action::Create,
                None
            ),
            Decision::Deny
        );
    }

    #[test]
    fn decide_is_deterministic() {
        let gate = gate();
        let candidate = principal(Role::Candidate);
        let snapshot = ResourceSnapshot::owned_by(AccountId::new());

        let first = gate.decide(
            &candidate,
            ResourceType::Submission,
            Action::Update,
            Some(&snapshot),
        );
        for _ in 0..10 {
            let again = gate.decide(
                &candidate,
                ResourceType::Submission,
                Action::Update,
                Some(&snapshot),
            );
            assert_eq!(first, again);
        }
    }

    #[test]
    fn require_allows_and_denies() {
        let gate = gate();
        assert!(
            gate.require(
                &Principal::anonymous(),
                ResourceType::Competition,
                Action::Read,
                None
            )
            .is_ok()
        );

        let result = gate.require(
            &Principal::anonymous(),
            ResourceType::Competition,
            Action::Create,
            None,
        );
        assert!(result.is_err());
    }
}
