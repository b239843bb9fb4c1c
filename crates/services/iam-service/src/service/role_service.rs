//! Roles, the permission catalog and role grants.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{
    merge_grants, Action, CreatePermission, CreateRole, GrantPermission, Grants, Permission,
    RequestContext, Resource, Role, RolePermission, UpdateRole,
};

use super::{authorize, validate};
use crate::repository::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRepository,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// What deleting a role touched besides the role itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleRemoval {
    pub grants_revoked: u64,
    pub users_detached: u64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(&self, ctx: &RequestContext, input: CreateRole) -> AppResult<Role>;

    async fn get_role(&self, ctx: &RequestContext, id: i64) -> AppResult<Role>;

    async fn list_roles(&self, ctx: &RequestContext) -> AppResult<Vec<Role>>;

    /// Update name, priority or activity. The code never changes.
    async fn update_role(&self, ctx: &RequestContext, id: i64, input: UpdateRole)
        -> AppResult<Role>;

    /// Delete a role after revoking its grants and detaching its users.
    async fn delete_role(&self, ctx: &RequestContext, id: i64) -> AppResult<RoleRemoval>;

    async fn create_permission(
        &self,
        ctx: &RequestContext,
        input: CreatePermission,
    ) -> AppResult<Permission>;

    async fn list_permissions(&self, ctx: &RequestContext) -> AppResult<Vec<Permission>>;

    /// Grant a permission to a role, replacing the flags of an earlier grant.
    async fn grant_permission(
        &self,
        ctx: &RequestContext,
        input: GrantPermission,
    ) -> AppResult<RolePermission>;

    /// Returns whether a grant existed
    async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool>;

    async fn list_role_permissions(
        &self,
        ctx: &RequestContext,
        role_id: i64,
    ) -> AppResult<Vec<RolePermission>>;

    /// Effective grants of a role keyed by resource. Used to build principals.
    async fn grants_for_role(&self, tenant_id: i64, role_id: i64) -> AppResult<Grants>;
}

pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    grants: Arc<dyn RolePermissionRepository>,
    users: Arc<dyn UserRepository>,
}

impl RoleManager {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        grants: Arc<dyn RolePermissionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            roles,
            permissions,
            grants,
            users,
        }
    }

    async fn require_role(&self, tenant_id: i64, role_id: i64) -> AppResult<Role> {
        self.roles
            .find_by_id(tenant_id, role_id)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn create_role(&self, ctx: &RequestContext, input: CreateRole) -> AppResult<Role> {
        validate(&input)?;

        if self.roles.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::conflict("Role name"));
        }

        let role = self.roles.create(ctx, input).await?;
        tracing::info!(role_id = role.id, code = %role.code, "Role created");
        Ok(role)
    }

    async fn get_role(&self, ctx: &RequestContext, id: i64) -> AppResult<Role> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::Role, Action::Read, Some(tenant_id))?;
        self.require_role(tenant_id, id).await
    }

    async fn list_roles(&self, ctx: &RequestContext) -> AppResult<Vec<Role>> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::Role, Action::Read, Some(tenant_id))?;
        self.roles.list(tenant_id).await
    }

    async fn update_role(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateRole,
    ) -> AppResult<Role> {
        validate(&input)?;
        let tenant_id = ctx.require_tenant()?;

        if let Some(name) = input.name.as_deref() {
            if let Some(existing) = self.roles.find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Role name"));
                }
            }
        }

        self.roles.update(ctx, tenant_id, id, input).await
    }

    async fn delete_role(&self, ctx: &RequestContext, id: i64) -> AppResult<RoleRemoval> {
        let tenant_id = ctx.require_tenant()?;

        // Every step must be allowed before the first one writes.
        authorize(ctx, Resource::Role, Action::Delete, Some(tenant_id))?;
        authorize(ctx, Resource::RolePermission, Action::Delete, Some(tenant_id))?;
        authorize(ctx, Resource::User, Action::Update, Some(tenant_id))?;

        self.require_role(tenant_id, id).await?;

        let grants_revoked = self.grants.revoke_all(ctx, tenant_id, id).await?;
        let users_detached = self.users.detach_role(ctx, tenant_id, id).await?;
        self.roles.delete(ctx, tenant_id, id).await?;

        tracing::info!(
            role_id = id,
            tenant_id,
            grants_revoked,
            users_detached,
            "Role deleted"
        );
        Ok(RoleRemoval {
            grants_revoked,
            users_detached,
        })
    }

    async fn create_permission(
        &self,
        ctx: &RequestContext,
        input: CreatePermission,
    ) -> AppResult<Permission> {
        validate(&input)?;

        if self.permissions.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::conflict("Permission"));
        }
        self.permissions.create(ctx, input).await
    }

    async fn list_permissions(&self, ctx: &RequestContext) -> AppResult<Vec<Permission>> {
        authorize(ctx, Resource::Permission, Action::Read, ctx.tenant_id())?;
        self.permissions.list().await
    }

    async fn grant_permission(
        &self,
        ctx: &RequestContext,
        input: GrantPermission,
    ) -> AppResult<RolePermission> {
        let tenant_id = match input.tenant_id {
            Some(id) => id,
            None => ctx.require_tenant()?,
        };

        self.require_role(tenant_id, input.role_id).await?;
        let permission = self
            .permissions
            .find_by_id(input.permission_id)
            .await?
            .ok_or_not_found()?;
        if !permission.is_active {
            return Err(AppError::validation(format!(
                "Permission '{}' is inactive",
                permission.name
            )));
        }

        let granted = self.grants.upsert(ctx, input).await?;
        tracing::debug!(
            role_id = granted.role_id,
            permission = %permission.name,
            "Permission granted"
        );
        Ok(granted)
    }

    async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool> {
        let tenant_id = ctx.require_tenant()?;
        self.grants
            .revoke(ctx, tenant_id, role_id, permission_id)
            .await
    }

    async fn list_role_permissions(
        &self,
        ctx: &RequestContext,
        role_id: i64,
    ) -> AppResult<Vec<RolePermission>> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::RolePermission, Action::Read, Some(tenant_id))?;
        self.grants.list_for_role(tenant_id, role_id).await
    }

    async fn grants_for_role(&self, tenant_id: i64, role_id: i64) -> AppResult<Grants> {
        let pairs = self.grants.resource_grants(tenant_id, role_id).await?;
        Ok(merge_grants(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockPermissionRepository, MockRolePermissionRepository, MockRoleRepository,
        MockUserRepository,
    };
    use domain::{Audit, PermissionGrant, Principal, UserType};
    use mockall::predicate::*;
    use mockall::Sequence;

    struct Mocks {
        roles: MockRoleRepository,
        permissions: MockPermissionRepository,
        grants: MockRolePermissionRepository,
        users: MockUserRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                roles: MockRoleRepository::new(),
                permissions: MockPermissionRepository::new(),
                grants: MockRolePermissionRepository::new(),
                users: MockUserRepository::new(),
            }
        }

        fn into_service(self) -> RoleManager {
            RoleManager::new(
                Arc::new(self.roles),
                Arc::new(self.permissions),
                Arc::new(self.grants),
                Arc::new(self.users),
            )
        }
    }

    fn role(id: i64, tenant_id: i64, name: &str) -> Role {
        Role {
            id,
            tenant_id,
            name: name.to_string(),
            code: domain::generate_code(tenant_id, name),
            priority: 0,
            is_active: true,
            audit: Audit::now(None),
        }
    }

    fn permission(id: i64, resource: &str, is_active: bool) -> Permission {
        Permission {
            id,
            name: format!("{}.manage", resource),
            resource: resource.to_string(),
            description: None,
            is_active,
            audit: Audit::now(None),
        }
    }

    fn admin_of(tenant_id: i64) -> RequestContext {
        RequestContext::for_principal(Principal::new(1, tenant_id, UserType::Admin))
    }

    #[tokio::test]
    async fn test_create_role_rejects_duplicate_name() {
        let mut mocks = Mocks::new();
        mocks
            .roles
            .expect_find_by_name()
            .with(eq("Editors"))
            .returning(|name| Ok(Some(role(1, 2, name))));
        mocks.roles.expect_create().never();

        let input = CreateRole {
            tenant_id: None,
            name: "Editors".to_string(),
            priority: None,
            is_active: None,
        };
        let result = mocks.into_service().create_role(&admin_of(1), input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_role_keeps_own_name() {
        let mut mocks = Mocks::new();
        mocks
            .roles
            .expect_find_by_name()
            .returning(|name| Ok(Some(role(3, 1, name))));
        mocks
            .roles
            .expect_update()
            .with(always(), eq(1), eq(3), always())
            .returning(|_, tenant_id, id, input| {
                Ok(role(id, tenant_id, input.name.as_deref().unwrap_or("x")))
            });

        let input = UpdateRole {
            name: Some("Editors".to_string()),
            ..Default::default()
        };
        let updated = mocks
            .into_service()
            .update_role(&admin_of(1), 3, input)
            .await
            .unwrap();

        assert_eq!(updated.name, "Editors");
    }

    #[tokio::test]
    async fn test_delete_role_revokes_detaches_then_deletes() {
        let mut mocks = Mocks::new();
        let mut seq = Sequence::new();

        mocks
            .roles
            .expect_find_by_id()
            .with(eq(1), eq(3))
            .returning(|tenant_id, id| Ok(Some(role(id, tenant_id, "Editors"))));
        mocks
            .grants
            .expect_revoke_all()
            .with(always(), eq(1), eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(4));
        mocks
            .users
            .expect_detach_role()
            .with(always(), eq(1), eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(2));
        mocks
            .roles
            .expect_delete()
            .with(always(), eq(1), eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let removal = mocks
            .into_service()
            .delete_role(&admin_of(1), 3)
            .await
            .unwrap();

        assert_eq!(
            removal,
            RoleRemoval {
                grants_revoked: 4,
                users_detached: 2
            }
        );
    }

    #[tokio::test]
    async fn test_delete_role_needs_every_step_allowed_up_front() {
        let mut mocks = Mocks::new();
        mocks.grants.expect_revoke_all().never();
        mocks.users.expect_detach_role().never();
        mocks.roles.expect_delete().never();

        let mut grants = Grants::new();
        grants.insert(
            Resource::RolePermission.as_str().to_string(),
            PermissionGrant {
                can_delete: true,
                ..Default::default()
            },
        );
        grants.insert(
            Resource::Role.as_str().to_string(),
            PermissionGrant {
                can_delete: true,
                ..Default::default()
            },
        );
        let ctx = RequestContext::for_principal(
            Principal::new(9, 1, UserType::User).with_grants(grants),
        );

        let result = mocks.into_service().delete_role(&ctx, 3).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_role_touches_nothing() {
        let mut mocks = Mocks::new();
        mocks.roles.expect_find_by_id().returning(|_, _| Ok(None));
        mocks.grants.expect_revoke_all().never();
        mocks.users.expect_detach_role().never();

        let result = mocks.into_service().delete_role(&admin_of(1), 3).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_grant_requires_active_permission() {
        let mut mocks = Mocks::new();
        mocks
            .roles
            .expect_find_by_id()
            .returning(|tenant_id, id| Ok(Some(role(id, tenant_id, "Editors"))));
        mocks
            .permissions
            .expect_find_by_id()
            .returning(|id| Ok(Some(permission(id, "brand", false))));
        mocks.grants.expect_upsert().never();

        let input = GrantPermission {
            tenant_id: None,
            role_id: 3,
            permission_id: 8,
            grant: PermissionGrant::all(),
        };
        let result = mocks.into_service().grant_permission(&admin_of(1), input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_grant_role_from_other_tenant_not_found() {
        let mut mocks = Mocks::new();
        mocks
            .roles
            .expect_find_by_id()
            .with(eq(1), eq(3))
            .returning(|_, _| Ok(None));

        let input = GrantPermission {
            tenant_id: None,
            role_id: 3,
            permission_id: 8,
            grant: PermissionGrant::read_only(),
        };
        let result = mocks.into_service().grant_permission(&admin_of(1), input).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_grants_for_role_merges_per_resource() {
        let mut mocks = Mocks::new();
        mocks
            .grants
            .expect_resource_grants()
            .with(eq(1), eq(3))
            .returning(|_, _| {
                Ok(vec![
                    ("brand".to_string(), PermissionGrant::read_only()),
                    (
                        "brand".to_string(),
                        PermissionGrant {
                            can_update: true,
                            ..Default::default()
                        },
                    ),
                    ("user".to_string(), PermissionGrant::read_only()),
                ])
            });

        let grants = mocks.into_service().grants_for_role(1, 3).await.unwrap();

        let brand = grants["brand"];
        assert!(brand.can_read && brand.can_update);
        assert!(!brand.can_delete);
        assert_eq!(grants.len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_list_permissions() {
        let result = Mocks::new()
            .into_service()
            .list_permissions(&RequestContext::anonymous())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
