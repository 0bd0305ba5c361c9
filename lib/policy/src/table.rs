//! The declarative policy rule table.
//!
//! Every authorization decision in the system traces back to this table;
//! nothing else in the codebase is allowed to hard-code a role check. The
//! table is built once at process start and is immutable afterwards, which
//! is what makes the gate a pure function.

use concours_platform_access::Role;
use std::collections::HashMap;

use crate::types::{Action, ResourceType};

/// A declarative mapping from (resource type, action) to the roles and
/// ownership conditions permitted to perform it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    /// The resource type this rule governs.
    pub resource_type: ResourceType,
    /// The action this rule governs.
    pub action: Action,
    /// Roles allowed to perform the action. `Role::Anonymous` must be listed
    /// explicitly for public actions; it is never implied.
    pub allowed_roles: Vec<Role>,
    /// Whether the resource's owner may perform the action regardless of
    /// role membership.
    pub owner_override: bool,
}

impl PolicyRule {
    /// Creates a rule allowing the given roles, without owner override.
    #[must_use]
    pub fn roles(
        resource_type: ResourceType,
        action: Action,
        allowed_roles: impl Into<Vec<Role>>,
    ) -> Self {
        Self {
            resource_type,
            action,
            allowed_roles: allowed_roles.into(),
            owner_override: false,
        }
    }

    /// Enables the owner override on this rule.
    #[must_use]
    pub fn with_owner_override(mut self) -> Self {
        self.owner_override = true;
        self
    }

    /// Returns true if the given role is in the allowed set.
    #[must_use]
    pub fn allows_role(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// The immutable rule table the gate consults.
///
/// Lookup is exact on `(resource type, action)`; a missing entry means the
/// action is denied for everyone (fail-closed). The table must therefore be
/// exhaustive for every action the resource handlers expose.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    rules: HashMap<(ResourceType, Action), PolicyRule>,
}

impl PolicyTable {
    /// Creates an empty table (denies everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any existing rule for the same pair.
    pub fn insert(&mut self, rule: PolicyRule) {
        self.rules.insert((rule.resource_type, rule.action), rule);
    }

    /// Looks up the rule for a (resource type, action) pair.
    #[must_use]
    pub fn rule(&self, resource_type: ResourceType, action: Action) -> Option<&PolicyRule> {
        self.rules.get(&(resource_type, action))
    }

    /// Returns the number of rules in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Builds the platform's standard rule table.
    ///
    /// Public listings (competition and submission reads) explicitly include
    /// `Anonymous`. Submission update/delete carry the owner override so a
    /// candidate can manage their own entries. Account records are readable
    /// and profile-editable by their owner via the override, while
    /// cross-account reads and status changes are admin-only. There is
    /// deliberately no rule for deleting account records: accounts are only
    /// ever suspended.
    #[must_use]
    pub fn platform_default() -> Self {
        use Action::*;
        use ResourceType::*;

        const EVERYONE: [Role; 4] = [Role::Admin, Role::Jury, Role::Candidate, Role::Anonymous];
        const MEMBERS: [Role; 3] = [Role::Admin, Role::Jury, Role::Candidate];

        let mut table = Self::new();

        table.insert(PolicyRule::roles(Competition, Read, EVERYONE));
        table.insert(PolicyRule::roles(Competition, Create, [Role::Admin]));
        table.insert(PolicyRule::roles(Competition, Update, [Role::Admin]));
        table.insert(PolicyRule::roles(Competition, Delete, [Role::Admin]));

        table.insert(PolicyRule::roles(Submission, Read, EVERYONE));
        table.insert(PolicyRule::roles(Submission, Create, [Role::Candidate]));
        table.insert(
            PolicyRule::roles(Submission, Update, [Role::Admin]).with_owner_override(),
        );
        table.insert(
            PolicyRule::roles(Submission, Delete, [Role::Admin]).with_owner_override(),
        );

        table.insert(PolicyRule::roles(UserRecord, ReadOwn, MEMBERS).with_owner_override());
        table.insert(PolicyRule::roles(UserRecord, ReadAny, [Role::Admin]));
        table.insert(PolicyRule::roles(UserRecord, UpdateStatus, [Role::Admin]));
        table.insert(
            PolicyRule::roles(UserRecord, UpdateOwnProfile, MEMBERS).with_owner_override(),
        );

        table.insert(PolicyRule::roles(Evaluation, Create, [Role::Jury]));
        table.insert(PolicyRule::roles(Evaluation, Read, [Role::Admin, Role::Jury]));

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_has_no_rules() {
        let table = PolicyTable::new();
        assert!(table.is_empty());
        assert!(table.rule(ResourceType::Competition, Action::Read).is_none());
    }

    #[test]
    fn insert_replaces_existing_rule() {
        let mut table = PolicyTable::new();
        table.insert(PolicyRule::roles(
            ResourceType::Competition,
            Action::Read,
            [Role::Admin],
        ));
        table.insert(PolicyRule::roles(
            ResourceType::Competition,
            Action::Read,
            [Role::Admin, Role::Jury],
        ));

        assert_eq!(table.len(), 1);
        let rule = table
            .rule(ResourceType::Competition, Action::Read)
            .expect("rule");
        assert!(rule.allows_role(Role::Jury));
    }

    #[test]
    fn default_table_public_reads_include_anonymous() {
        let table = PolicyTable::platform_default();
        for resource_type in [ResourceType::Competition, ResourceType::Submission] {
            let rule = table.rule(resource_type, Action::Read).expect("rule");
            assert!(rule.allows_role(Role::Anonymous), "{resource_type} read");
        }
    }

    #[test]
    fn default_table_competition_mutations_are_admin_only() {
        let table = PolicyTable::platform_default();
        for action in [Action::Create, Action::Update, Action::Delete] {
            let rule = table.rule(ResourceType::Competition, action).expect("rule");
            assert_eq!(rule.allowed_roles, vec![Role::Admin], "{action}");
            assert!(!rule.owner_override, "{action}");
        }
    }

    #[test]
    fn default_table_submission_mutations_have_owner_override() {
        let table = PolicyTable::platform_default();
        for action in [Action::Update, Action::Delete] {
            let rule = table.rule(ResourceType::Submission, action).expect("rule");
            assert!(rule.owner_override, "{action}");
            assert!(rule.allows_role(Role::Admin), "{action}");
            assert!(!rule.allows_role(Role::Candidate), "{action}");
        }
    }

    #[test]
    fn default_table_has_no_user_record_delete() {
        let table = PolicyTable::platform_default();
        assert!(table.rule(ResourceType::UserRecord, Action::Delete).is_none());
    }

    #[test]
    fn default_table_evaluation_create_is_jury_only() {
        let table = PolicyTable::platform_default();
        let rule = table
            .rule(ResourceType::Evaluation, Action::Create)
            .expect("rule");
        assert_eq!(rule.allowed_roles, vec![Role::Jury]);
        assert!(!rule.owner_override);
    }
}
