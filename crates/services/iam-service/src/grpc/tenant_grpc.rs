//! gRPC implementation for TenantService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::context::resolve;
use super::convert::{parse_json, parse_status, parse_timestamp, tenant_to_proto};
use crate::service::{AuthService, TenantService};
use domain::{CreateTenant, UpdateTenant};
use proto::iam::{
    tenant_service_server::TenantService as TenantServiceProto, CreateTenantRequest, IdRequest,
    ListRequest, ListTenantsResponse, TenantResponse, UpdateTenantRequest,
};

pub struct TenantGrpcService {
    service: Arc<dyn TenantService>,
    auth: Arc<dyn AuthService>,
}

impl TenantGrpcService {
    pub fn new(service: Arc<dyn TenantService>, auth: Arc<dyn AuthService>) -> Self {
        Self { service, auth }
    }
}

#[tonic::async_trait]
impl TenantServiceProto for TenantGrpcService {
    async fn create_tenant(
        &self,
        request: Request<CreateTenantRequest>,
    ) -> Result<Response<TenantResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = CreateTenant {
            name: req.name,
            slug: req.slug,
            domain: req.domain,
            status: parse_status(req.status)?,
            settings: parse_json("settings", req.settings)?,
            metadata: parse_json("metadata", req.metadata)?,
            expires_at: parse_timestamp(req.expires_at)?,
        };

        let tenant = self
            .service
            .create_tenant(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(tenant_to_proto(&tenant)))
    }

    async fn get_tenant(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<TenantResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        let tenant = self
            .service
            .get_tenant(&ctx, id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(tenant_to_proto(&tenant)))
    }

    async fn list_tenants(
        &self,
        request: Request<ListRequest>,
    ) -> Result<Response<ListTenantsResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;

        let tenants = self.service.list_tenants(&ctx).await.map_err(Status::from)?;
        let total = tenants.len() as i32;
        let tenants = tenants.iter().map(tenant_to_proto).collect();

        Ok(Response::new(ListTenantsResponse { tenants, total }))
    }

    async fn update_tenant(
        &self,
        request: Request<UpdateTenantRequest>,
    ) -> Result<Response<TenantResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = UpdateTenant {
            name: req.name,
            status: parse_status(req.status)?,
            settings: parse_json("settings", req.settings)?,
            metadata: parse_json("metadata", req.metadata)?,
            expires_at: parse_timestamp(req.expires_at)?,
            is_active: req.is_active,
        };

        let tenant = self
            .service
            .update_tenant(&ctx, req.id, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(tenant_to_proto(&tenant)))
    }
}
