//! Tenant registry use cases.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{Action, CreateTenant, RequestContext, Resource, Tenant, UpdateTenant};

use super::{authorize, validate};
use crate::repository::TenantRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantService: Send + Sync {
    /// Register a tenant. Slug and domain must be unused.
    async fn create_tenant(&self, ctx: &RequestContext, input: CreateTenant) -> AppResult<Tenant>;

    async fn get_tenant(&self, ctx: &RequestContext, id: i64) -> AppResult<Tenant>;

    /// Tenants visible to the caller
    async fn list_tenants(&self, ctx: &RequestContext) -> AppResult<Vec<Tenant>>;

    async fn update_tenant(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateTenant,
    ) -> AppResult<Tenant>;
}

pub struct TenantManager {
    repo: Arc<dyn TenantRepository>,
}

impl TenantManager {
    pub fn new(repo: Arc<dyn TenantRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TenantService for TenantManager {
    async fn create_tenant(&self, ctx: &RequestContext, input: CreateTenant) -> AppResult<Tenant> {
        validate(&input)?;

        if self.repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::conflict("Slug"));
        }
        if let Some(domain) = input.domain.as_deref() {
            if self.repo.find_by_domain(domain).await?.is_some() {
                return Err(AppError::conflict("Domain"));
            }
        }

        let tenant = self.repo.create(ctx, input).await?;
        tracing::info!(tenant_id = tenant.id, slug = %tenant.slug, "Tenant created");
        Ok(tenant)
    }

    async fn get_tenant(&self, ctx: &RequestContext, id: i64) -> AppResult<Tenant> {
        authorize(ctx, Resource::Tenant, Action::Read, Some(id))?;
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_tenants(&self, ctx: &RequestContext) -> AppResult<Vec<Tenant>> {
        let tenants = self.repo.list().await?;
        Ok(tenants
            .into_iter()
            .filter(|t| authorize(ctx, Resource::Tenant, Action::Read, Some(t.id)).is_ok())
            .collect())
    }

    async fn update_tenant(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateTenant,
    ) -> AppResult<Tenant> {
        validate(&input)?;
        self.repo.update(ctx, id, input).await
    }
}
