//! Tenant registry repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use super::entities::tenant::{self, ActiveModel, Entity as TenantEntity};
use crate::hooks::{global_hooks, Mutation, Persist, Pipeline};
use common::{AppResult, OptionExt};
use domain::{CreateTenant, RequestContext, Tenant, TenantStatus, UpdateTenant};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tenant>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tenant>>;

    async fn find_by_domain(&self, domain: &str) -> AppResult<Option<Tenant>>;

    async fn list(&self) -> AppResult<Vec<Tenant>>;

    async fn create(&self, ctx: &RequestContext, input: CreateTenant) -> AppResult<Tenant>;

    async fn update(&self, ctx: &RequestContext, id: i64, input: UpdateTenant)
        -> AppResult<Tenant>;
}

pub struct TenantStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl TenantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline = Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), global_hooks());
        Self { db, pipeline }
    }
}

#[async_trait]
impl TenantRepository for TenantStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tenant>> {
        let result = TenantEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Tenant::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tenant>> {
        let result = TenantEntity::find()
            .filter(tenant::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(result.map(Tenant::from))
    }

    async fn find_by_domain(&self, domain: &str) -> AppResult<Option<Tenant>> {
        let result = TenantEntity::find()
            .filter(tenant::Column::Domain.eq(domain))
            .one(&self.db)
            .await?;
        Ok(result.map(Tenant::from))
    }

    async fn list(&self) -> AppResult<Vec<Tenant>> {
        let tenants = TenantEntity::find()
            .order_by_asc(tenant::Column::Id)
            .all(&self.db)
            .await?;
        Ok(tenants.into_iter().map(Tenant::from).collect())
    }

    async fn create(&self, ctx: &RequestContext, input: CreateTenant) -> AppResult<Tenant> {
        let model = ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            domain: Set(input.domain),
            status: Set(input
                .status
                .unwrap_or(TenantStatus::Active)
                .as_str()
                .to_string()),
            settings: Set(input.settings.unwrap_or_else(|| serde_json::json!({}))),
            metadata: Set(input.metadata.unwrap_or_else(|| serde_json::json!({}))),
            expires_at: Set(input.expires_at),
            ..Default::default()
        };

        let saved = self
            .pipeline
            .run(ctx, Mutation::create(model))
            .await?
            .into_model()?;
        Ok(Tenant::from(saved))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateTenant,
    ) -> AppResult<Tenant> {
        let mut model = TenantEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?
            .into_active_model();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(status) = input.status {
            model.status = Set(status.as_str().to_string());
        }
        if let Some(settings) = input.settings {
            model.settings = Set(settings);
        }
        if let Some(metadata) = input.metadata {
            model.metadata = Set(metadata);
        }
        if let Some(expires_at) = input.expires_at {
            model.expires_at = Set(Some(expires_at));
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }

        let saved = self
            .pipeline
            .run(ctx, Mutation::update_one(model))
            .await?
            .into_model()?;
        Ok(Tenant::from(saved))
    }
}
