//! Brand use cases.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{Action, Brand, CreateBrand, RequestContext, Resource, UpdateBrand};

use super::{authorize, validate};
use crate::repository::BrandRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BrandService: Send + Sync {
    async fn create_brand(&self, ctx: &RequestContext, input: CreateBrand) -> AppResult<Brand>;

    async fn get_brand(&self, ctx: &RequestContext, id: i64) -> AppResult<Brand>;

    async fn list_brands(&self, ctx: &RequestContext) -> AppResult<Vec<Brand>>;

    /// Rename a brand. Its code stays as generated.
    async fn update_brand(&self, ctx: &RequestContext, id: i64, input: UpdateBrand)
        -> AppResult<Brand>;

    async fn delete_brand(&self, ctx: &RequestContext, id: i64) -> AppResult<()>;
}

pub struct BrandManager {
    repo: Arc<dyn BrandRepository>,
}

impl BrandManager {
    pub fn new(repo: Arc<dyn BrandRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl BrandService for BrandManager {
    async fn create_brand(&self, ctx: &RequestContext, input: CreateBrand) -> AppResult<Brand> {
        validate(&input)?;
        self.repo.create(ctx, input).await
    }

    async fn get_brand(&self, ctx: &RequestContext, id: i64) -> AppResult<Brand> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::Brand, Action::Read, Some(tenant_id))?;
        self.repo.find_by_id(tenant_id, id).await?.ok_or_not_found()
    }

    async fn list_brands(&self, ctx: &RequestContext) -> AppResult<Vec<Brand>> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::Brand, Action::Read, Some(tenant_id))?;
        self.repo.list(tenant_id).await
    }

    async fn update_brand(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateBrand,
    ) -> AppResult<Brand> {
        validate(&input)?;
        let tenant_id = ctx.require_tenant()?;
        self.repo.update(ctx, tenant_id, id, input).await
    }

    async fn delete_brand(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        let tenant_id = ctx.require_tenant()?;
        self.repo.delete(ctx, tenant_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBrandRepository;
    use common::AppError;
    use domain::{generate_code, Audit, Grants, PermissionGrant, Principal, UserType};
    use mockall::predicate::*;

    fn brand(id: i64, tenant_id: i64, name: &str) -> Brand {
        Brand {
            id,
            tenant_id,
            name: name.to_string(),
            code: generate_code(tenant_id, name),
            audit: Audit::now(None),
        }
    }

    fn reader_of(tenant_id: i64) -> RequestContext {
        let mut grants = Grants::new();
        grants.insert("brand".to_string(), PermissionGrant::read_only());
        RequestContext::for_principal(
            Principal::new(5, tenant_id, UserType::User).with_grants(grants),
        )
    }

    #[tokio::test]
    async fn test_reader_lists_own_tenant_brands() {
        let mut repo = MockBrandRepository::new();
        repo.expect_list()
            .with(eq(2))
            .returning(|tenant_id| Ok(vec![brand(1, tenant_id, "My Brand")]));

        let service = BrandManager::new(Arc::new(repo));
        let brands = service.list_brands(&reader_of(2)).await.unwrap();

        assert_eq!(brands[0].code, "tenant:2:code:my_brand");
    }

    #[tokio::test]
    async fn test_get_brand_without_grant_is_forbidden() {
        let service = BrandManager::new(Arc::new(MockBrandRepository::new()));
        let ctx = RequestContext::for_principal(Principal::new(5, 2, UserType::User));

        let result = service.get_brand(&ctx, 1).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_brand_validates_name() {
        let service = BrandManager::new(Arc::new(MockBrandRepository::new()));
        let input = CreateBrand {
            tenant_id: Some(1),
            name: String::new(),
        };

        let result = service.create_brand(&RequestContext::system(), input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_brand_requires_tenant() {
        let mut repo = MockBrandRepository::new();
        repo.expect_delete().never();

        let service = BrandManager::new(Arc::new(repo));
        let result = service.delete_brand(&RequestContext::system(), 1).await;

        assert!(matches!(result, Err(AppError::MissingTenantContext)));
    }
}
