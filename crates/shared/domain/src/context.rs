//! Request context passed explicitly through services and mutation hooks.
//!
//! Nothing in this workspace reads the tenant from ambient or task-local
//! state: whoever handles a request builds a [`RequestContext`] once and hands
//! it down.

use crate::error::{DomainError, DomainResult};
use crate::permission::{Grants, PermissionGrant};
use crate::user::UserType;

/// An authenticated user acting inside a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub tenant_id: i64,
    pub user_type: UserType,
    pub grants: Grants,
}

impl Principal {
    pub fn new(user_id: i64, tenant_id: i64, user_type: UserType) -> Self {
        Self {
            user_id,
            tenant_id,
            user_type,
            grants: Grants::new(),
        }
    }

    pub fn with_grants(mut self, grants: Grants) -> Self {
        self.grants = grants;
        self
    }

    /// Grant held on a resource (empty if none)
    pub fn grant_for(&self, resource: &str) -> PermissionGrant {
        self.grants.get(resource).copied().unwrap_or_default()
    }
}

/// Who is performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Internal callers: migrations, seeding, background work
    System,
    /// No credentials were presented
    Anonymous,
    User(Principal),
}

impl Actor {
    /// Acting user id, if any
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Actor::User(principal) => Some(principal.user_id),
            _ => None,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Actor::User(principal) => Some(principal),
            _ => None,
        }
    }
}

/// Per-request state: the resolved tenant and the acting principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    tenant_id: Option<i64>,
    actor: Actor,
}

impl RequestContext {
    pub fn new(actor: Actor, tenant_id: Option<i64>) -> Self {
        Self {
            tenant_id: tenant_id.filter(|id| *id > 0),
            actor,
        }
    }

    /// System actor with no tenant
    pub fn system() -> Self {
        Self::new(Actor::System, None)
    }

    /// System actor working inside one tenant
    pub fn system_for_tenant(tenant_id: i64) -> Self {
        Self::new(Actor::System, Some(tenant_id))
    }

    pub fn anonymous() -> Self {
        Self::new(Actor::Anonymous, None)
    }

    /// Context of an authenticated user, scoped to the user's own tenant
    pub fn for_principal(principal: Principal) -> Self {
        let tenant_id = principal.tenant_id;
        Self::new(Actor::User(principal), Some(tenant_id))
    }

    /// Re-scope the context to another tenant
    pub fn with_tenant(mut self, tenant_id: i64) -> Self {
        self.tenant_id = Some(tenant_id).filter(|id| *id > 0);
        self
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant_id
    }

    /// Tenant of the request, or `MissingTenantContext`
    pub fn require_tenant(&self) -> DomainResult<i64> {
        self.tenant_id.ok_or(DomainError::MissingTenantContext)
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_context_uses_principal_tenant() {
        let ctx = RequestContext::for_principal(Principal::new(7, 3, UserType::User));
        assert_eq!(ctx.tenant_id(), Some(3));
        assert_eq!(ctx.actor().user_id(), Some(7));
    }

    #[test]
    fn test_missing_tenant() {
        assert_eq!(
            RequestContext::system().require_tenant(),
            Err(DomainError::MissingTenantContext)
        );
    }

    #[test]
    fn test_non_positive_tenant_is_absent() {
        let ctx = RequestContext::system_for_tenant(0);
        assert_eq!(ctx.tenant_id(), None);
        assert_eq!(ctx.with_tenant(-4).tenant_id(), None);
    }

    #[test]
    fn test_with_tenant_rescopes() {
        let ctx = RequestContext::system_for_tenant(1).with_tenant(9);
        assert_eq!(ctx.require_tenant(), Ok(9));
    }

    #[test]
    fn test_grant_for_unknown_resource_is_empty() {
        let principal = Principal::new(1, 1, UserType::User);
        assert!(principal.grant_for("brand").is_empty());
    }
}
