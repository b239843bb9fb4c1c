//! Role repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use super::set_some;
use crate::hooks::{tenant_scoped_hooks, Mutation, Persist, Pipeline};
use common::{AppResult, OptionExt};
use domain::{CreateRole, RequestContext, Role, UpdateRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<Role>>;

    /// Role names are unique across tenants
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Roles of a tenant, highest priority first
    async fn list(&self, tenant_id: i64) -> AppResult<Vec<Role>>;

    /// Create a role. The code is generated by the tenant hook.
    async fn create(&self, ctx: &RequestContext, input: CreateRole) -> AppResult<Role>;

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        input: UpdateRole,
    ) -> AppResult<Role>;

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()>;
}

pub struct RoleStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline =
            Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), tenant_scoped_hooks());
        Self { db, pipeline }
    }

    async fn load(&self, tenant_id: i64, id: i64) -> AppResult<role::Model> {
        RoleEntity::find_by_id(id)
            .filter(role::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id)
            .filter(role::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Role::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Role::from))
    }

    async fn list(&self, tenant_id: i64) -> AppResult<Vec<Role>> {
        let roles = RoleEntity::find()
            .filter(role::Column::TenantId.eq(tenant_id))
            .order_by_desc(role::Column::Priority)
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn create(&self, ctx: &RequestContext, input: CreateRole) -> AppResult<Role> {
        let model = ActiveModel {
            tenant_id: set_some(input.tenant_id),
            name: Set(input.name),
            priority: Set(input.priority.unwrap_or(0)),
            is_active: Set(input.is_active.unwrap_or(true)),
            ..Default::default()
        };

        let saved = self
            .pipeline
            .run(ctx, Mutation::create(model))
            .await?
            .into_model()?;
        Ok(Role::from(saved))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        input: UpdateRole,
    ) -> AppResult<Role> {
        let mut model = self.load(tenant_id, id).await?.into_active_model();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(priority) = input.priority {
            model.priority = Set(priority);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }

        let saved = self
            .pipeline
            .run(ctx, Mutation::update_one(model))
            .await?
            .into_model()?;
        Ok(Role::from(saved))
    }

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()> {
        let model = self.load(tenant_id, id).await?.into_active_model();
        self.pipeline.run(ctx, Mutation::delete_one(model)).await?;
        Ok(())
    }
}
