//! Global permission catalog.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;

use super::entities::permission::{self, ActiveModel, Entity as PermissionEntity};
use crate::hooks::{global_hooks, Mutation, Persist, Pipeline};
use common::AppResult;
use domain::{CreatePermission, Permission, RequestContext};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    async fn list(&self) -> AppResult<Vec<Permission>>;

    async fn create(&self, ctx: &RequestContext, input: CreatePermission)
        -> AppResult<Permission>;
}

pub struct PermissionStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl PermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline =
            Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), global_hooks());
        Self { db, pipeline }
    }
}

#[async_trait]
impl PermissionRepository for PermissionStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        let result = PermissionEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Permission::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let result = PermissionEntity::find()
            .filter(permission::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Permission::from))
    }

    async fn list(&self) -> AppResult<Vec<Permission>> {
        let permissions = PermissionEntity::find()
            .order_by_asc(permission::Column::Resource)
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await?;
        Ok(permissions.into_iter().map(Permission::from).collect())
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        input: CreatePermission,
    ) -> AppResult<Permission> {
        let model = ActiveModel {
            name: Set(input.name),
            resource: Set(input.resource),
            description: Set(input.description),
            ..Default::default()
        };

        let saved = self
            .pipeline
            .run(ctx, Mutation::create(model))
            .await?
            .into_model()?;
        Ok(Permission::from(saved))
    }
}
