//! Authorization policies as ordered predicate lists.
//!
//! A [`Policy`] holds named rules evaluated in order. Each rule looks at the
//! actor, the action and the subject and either decides (`Allow`/`Deny`) or
//! passes (`Skip`). The first decision wins; a policy whose rules all skip
//! denies.

use std::fmt;
use std::sync::Arc;

use crate::context::Actor;
use crate::error::{DomainError, DomainResult};

/// Operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of protected entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Tenant,
    User,
    Role,
    Permission,
    RolePermission,
    Brand,
}

impl Resource {
    /// Name used as the `resource` column of permissions
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Tenant => "tenant",
            Resource::User => "user",
            Resource::Role => "role",
            Resource::Permission => "permission",
            Resource::RolePermission => "role_permission",
            Resource::Brand => "brand",
        }
    }

    /// Whether rows of this resource belong to a tenant
    pub fn is_tenant_scoped(&self) -> bool {
        !matches!(self, Resource::Tenant | Resource::Permission)
    }

    /// The built-in policy guarding this resource
    pub fn policy(&self) -> Policy {
        match self {
            Resource::Tenant => Policy::tenant_registry(),
            Resource::Permission => Policy::permission_catalog(),
            _ => Policy::tenant_scoped(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is being acted upon.
///
/// For tenant-scoped resources `tenant_id` is the owning tenant. For the
/// tenant registry it is the tenant itself; for bulk or list operations it
/// is the tenant the request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub resource: Resource,
    pub tenant_id: Option<i64>,
}

impl Subject {
    pub fn new(resource: Resource, tenant_id: Option<i64>) -> Self {
        Self {
            resource,
            tenant_id,
        }
    }
}

/// Outcome of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
    Skip,
}

type RuleFn = dyn Fn(&Actor, Action, &Subject) -> Decision + Send + Sync;

#[derive(Clone)]
struct Rule {
    name: &'static str,
    check: Arc<RuleFn>,
}

/// Ordered, short-circuiting rule list.
#[derive(Clone, Default)]
pub struct Policy {
    rules: Vec<Rule>,
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name))
            .finish()
    }
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; rules run in insertion order.
    pub fn rule<F>(mut self, name: &'static str, check: F) -> Self
    where
        F: Fn(&Actor, Action, &Subject) -> Decision + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            name,
            check: Arc::new(check),
        });
        self
    }

    /// Names of the rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Run the rules and return the first decision (deny if none decides).
    pub fn evaluate(&self, actor: &Actor, action: Action, subject: &Subject) -> Decision {
        for rule in &self.rules {
            match (rule.check)(actor, action, subject) {
                Decision::Skip => continue,
                decision => {
                    tracing::debug!(
                        rule = rule.name,
                        resource = %subject.resource,
                        action = %action,
                        allowed = decision == Decision::Allow,
                        "Policy decided"
                    );
                    return decision;
                }
            }
        }
        Decision::Deny(format!(
            "no rule allows {} on {}",
            action, subject.resource
        ))
    }

    /// Like [`evaluate`](Self::evaluate) but as a `Result`.
    pub fn authorize(&self, actor: &Actor, action: Action, subject: &Subject) -> DomainResult<()> {
        match self.evaluate(actor, action, subject) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(DomainError::forbidden(reason)),
            Decision::Skip => Err(DomainError::forbidden("no rule decided")),
        }
    }

    /// Users, roles, grants and brands.
    pub fn tenant_scoped() -> Self {
        Self::new()
            .rule("allow_system", rules::allow_system)
            .rule("deny_anonymous", rules::deny_anonymous)
            .rule("allow_super_admin", rules::allow_super_admin)
            .rule("deny_cross_tenant", rules::deny_cross_tenant)
            .rule("allow_tenant_admin", rules::allow_tenant_admin)
            .rule("allow_granted", rules::allow_granted)
    }

    /// Tenants themselves: managed by the platform, readable by members.
    pub fn tenant_registry() -> Self {
        Self::new()
            .rule("allow_system", rules::allow_system)
            .rule("deny_anonymous", rules::deny_anonymous)
            .rule("allow_super_admin", rules::allow_super_admin)
            .rule("allow_read_own_tenant", rules::allow_read_own_tenant)
    }

    /// The global permission catalog: managed by the platform, readable by all.
    pub fn permission_catalog() -> Self {
        Self::new()
            .rule("allow_system", rules::allow_system)
            .rule("deny_anonymous", rules::deny_anonymous)
            .rule("allow_super_admin", rules::allow_super_admin)
            .rule("allow_authenticated_read", rules::allow_authenticated_read)
    }
}

/// Built-in rules.
pub mod rules {
    use super::{Action, Decision, Subject};
    use crate::context::Actor;

    pub fn allow_system(actor: &Actor, _: Action, _: &Subject) -> Decision {
        match actor {
            Actor::System => Decision::Allow,
            _ => Decision::Skip,
        }
    }

    pub fn deny_anonymous(actor: &Actor, _: Action, _: &Subject) -> Decision {
        match actor {
            Actor::Anonymous => Decision::Deny("authentication required".to_string()),
            _ => Decision::Skip,
        }
    }

    pub fn allow_super_admin(actor: &Actor, _: Action, _: &Subject) -> Decision {
        match actor.principal() {
            Some(p) if p.user_type.is_super_admin() => Decision::Allow,
            _ => Decision::Skip,
        }
    }

    pub fn deny_cross_tenant(actor: &Actor, _: Action, subject: &Subject) -> Decision {
        match (actor.principal(), subject.tenant_id) {
            (Some(p), Some(tenant_id)) if p.tenant_id != tenant_id => {
                Decision::Deny("resource belongs to another tenant".to_string())
            }
            (Some(_), None) => Decision::Deny("resource has no tenant".to_string()),
            _ => Decision::Skip,
        }
    }

    pub fn allow_tenant_admin(actor: &Actor, _: Action, _: &Subject) -> Decision {
        match actor.principal() {
            Some(p) if p.user_type.is_admin() => Decision::Allow,
            _ => Decision::Skip,
        }
    }

    pub fn allow_granted(actor: &Actor, action: Action, subject: &Subject) -> Decision {
        match actor.principal() {
            Some(p) if p.grant_for(subject.resource.as_str()).allows(action) => Decision::Allow,
            _ => Decision::Skip,
        }
    }

    pub fn allow_read_own_tenant(actor: &Actor, action: Action, subject: &Subject) -> Decision {
        match (actor.principal(), subject.tenant_id) {
            (Some(p), Some(tenant_id)) if action == Action::Read && p.tenant_id == tenant_id => {
                Decision::Allow
            }
            _ => Decision::Skip,
        }
    }

    pub fn allow_authenticated_read(actor: &Actor, action: Action, _: &Subject) -> Decision {
        match actor {
            Actor::User(_) if action == Action::Read => Decision::Allow,
            _ => Decision::Skip,
        }
    }
}
