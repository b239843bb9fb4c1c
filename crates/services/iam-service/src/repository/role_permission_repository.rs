//! Grants of catalog permissions to roles.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use super::entities::permission;
use super::entities::role_permission::{self, ActiveModel, Entity as RolePermissionEntity};
use super::set_some;
use crate::hooks::{tenant_scoped_hooks, Mutation, Persist, Pipeline};
use common::AppResult;
use domain::{GrantPermission, PermissionGrant, RequestContext, RolePermission};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    async fn find(
        &self,
        tenant_id: i64,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<Option<RolePermission>>;

    async fn list_for_role(&self, tenant_id: i64, role_id: i64) -> AppResult<Vec<RolePermission>>;

    /// Each grant of the role paired with the resource of its permission.
    /// Inactive permissions are skipped.
    async fn resource_grants(
        &self,
        tenant_id: i64,
        role_id: i64,
    ) -> AppResult<Vec<(String, PermissionGrant)>>;

    /// Insert the grant, or overwrite the flags of an existing one
    async fn upsert(&self, ctx: &RequestContext, input: GrantPermission)
        -> AppResult<RolePermission>;

    /// Returns whether a grant was removed
    async fn revoke(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool>;

    /// Remove every grant of a role. Returns the number removed.
    async fn revoke_all(&self, ctx: &RequestContext, tenant_id: i64, role_id: i64)
        -> AppResult<u64>;
}

pub struct RolePermissionStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl RolePermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline =
            Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), tenant_scoped_hooks());
        Self { db, pipeline }
    }

    async fn load(
        &self,
        tenant_id: i64,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<Option<role_permission::Model>> {
        let result = RolePermissionEntity::find()
            .filter(role_permission::Column::TenantId.eq(tenant_id))
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .one(&self.db)
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl RolePermissionRepository for RolePermissionStore {
    async fn find(
        &self,
        tenant_id: i64,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<Option<RolePermission>> {
        let result = self.load(tenant_id, role_id, permission_id).await?;
        Ok(result.map(RolePermission::from))
    }

    async fn list_for_role(&self, tenant_id: i64, role_id: i64) -> AppResult<Vec<RolePermission>> {
        let grants = RolePermissionEntity::find()
            .filter(role_permission::Column::TenantId.eq(tenant_id))
            .filter(role_permission::Column::RoleId.eq(role_id))
            .order_by_asc(role_permission::Column::PermissionId)
            .all(&self.db)
            .await?;
        Ok(grants.into_iter().map(RolePermission::from).collect())
    }

    async fn resource_grants(
        &self,
        tenant_id: i64,
        role_id: i64,
    ) -> AppResult<Vec<(String, PermissionGrant)>> {
        let rows = RolePermissionEntity::find()
            .filter(role_permission::Column::TenantId.eq(tenant_id))
            .filter(role_permission::Column::RoleId.eq(role_id))
            .find_also_related(permission::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(grant, permission)| {
                permission
                    .filter(|p| p.is_active)
                    .map(|p| (p.resource, grant.grant()))
            })
            .collect())
    }

    async fn upsert(
        &self,
        ctx: &RequestContext,
        input: GrantPermission,
    ) -> AppResult<RolePermission> {
        let existing = match input.tenant_id.or(ctx.tenant_id()) {
            Some(tenant_id) => {
                self.load(tenant_id, input.role_id, input.permission_id)
                    .await?
            }
            None => None,
        };

        let mutation = match existing {
            Some(row) => {
                let mut model = row.into_active_model();
                model.set_grant(input.grant);
                Mutation::update_one(model)
            }
            None => {
                let mut model = ActiveModel {
                    tenant_id: set_some(input.tenant_id),
                    role_id: Set(input.role_id),
                    permission_id: Set(input.permission_id),
                    ..Default::default()
                };
                model.set_grant(input.grant);
                Mutation::create(model)
            }
        };

        let saved = self.pipeline.run(ctx, mutation).await?.into_model()?;
        Ok(RolePermission::from(saved))
    }

    async fn revoke(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool> {
        let Some(row) = self.load(tenant_id, role_id, permission_id).await? else {
            return Ok(false);
        };

        let outcome = self
            .pipeline
            .run(ctx, Mutation::delete_one(row.into_active_model()))
            .await?;
        Ok(outcome.rows_affected() > 0)
    }

    async fn revoke_all(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        role_id: i64,
    ) -> AppResult<u64> {
        let filter = Condition::all()
            .add(role_permission::Column::TenantId.eq(tenant_id))
            .add(role_permission::Column::RoleId.eq(role_id));

        let outcome = self
            .pipeline
            .run(ctx, Mutation::delete_many(filter))
            .await?;
        Ok(outcome.rows_affected())
    }
}
