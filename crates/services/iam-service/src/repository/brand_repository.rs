//! Brand repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use super::entities::brand::{self, ActiveModel, Entity as BrandEntity};
use super::set_some;
use crate::hooks::{tenant_scoped_hooks, Mutation, Persist, Pipeline};
use common::{AppResult, OptionExt};
use domain::{Brand, CreateBrand, RequestContext, UpdateBrand};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<Brand>>;

    async fn list(&self, tenant_id: i64) -> AppResult<Vec<Brand>>;

    async fn create(&self, ctx: &RequestContext, input: CreateBrand) -> AppResult<Brand>;

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        input: UpdateBrand,
    ) -> AppResult<Brand>;

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()>;
}

pub struct BrandStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl BrandStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline =
            Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), tenant_scoped_hooks());
        Self { db, pipeline }
    }

    async fn load(&self, tenant_id: i64, id: i64) -> AppResult<brand::Model> {
        BrandEntity::find_by_id(id)
            .filter(brand::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl BrandRepository for BrandStore {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<Brand>> {
        let result = BrandEntity::find_by_id(id)
            .filter(brand::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Brand::from))
    }

    async fn list(&self, tenant_id: i64) -> AppResult<Vec<Brand>> {
        let brands = BrandEntity::find()
            .filter(brand::Column::TenantId.eq(tenant_id))
            .order_by_asc(brand::Column::Name)
            .all(&self.db)
            .await?;
        Ok(brands.into_iter().map(Brand::from).collect())
    }

    async fn create(&self, ctx: &RequestContext, input: CreateBrand) -> AppResult<Brand> {
        let model = ActiveModel {
            tenant_id: set_some(input.tenant_id),
            name: Set(input.name),
            ..Default::default()
        };

        let saved = self
            .pipeline
            .run(ctx, Mutation::create(model))
            .await?
            .into_model()?;
        Ok(Brand::from(saved))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        input: UpdateBrand,
    ) -> AppResult<Brand> {
        let mut model = self.load(tenant_id, id).await?.into_active_model();
        if let Some(name) = input.name {
            model.name = Set(name);
        }

        let saved = self
            .pipeline
            .run(ctx, Mutation::update_one(model))
            .await?
            .into_model()?;
        Ok(Brand::from(saved))
    }

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()> {
        let model = self.load(tenant_id, id).await?.into_active_model();
        self.pipeline.run(ctx, Mutation::delete_one(model)).await?;
        Ok(())
    }
}
