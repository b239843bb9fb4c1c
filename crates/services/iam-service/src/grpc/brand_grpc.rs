//! gRPC implementation for BrandService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::context::resolve;
use super::convert::brand_to_proto;
use crate::service::{AuthService, BrandService};
use domain::{CreateBrand, UpdateBrand};
use proto::iam::{
    brand_service_server::BrandService as BrandServiceProto, BrandResponse, CreateBrandRequest,
    DeleteResponse, IdRequest, ListBrandsResponse, ListRequest, UpdateBrandRequest,
};

pub struct BrandGrpcService {
    service: Arc<dyn BrandService>,
    auth: Arc<dyn AuthService>,
}

impl BrandGrpcService {
    pub fn new(service: Arc<dyn BrandService>, auth: Arc<dyn AuthService>) -> Self {
        Self { service, auth }
    }
}

#[tonic::async_trait]
impl BrandServiceProto for BrandGrpcService {
    async fn create_brand(
        &self,
        request: Request<CreateBrandRequest>,
    ) -> Result<Response<BrandResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = CreateBrand {
            tenant_id: req.tenant_id,
            name: req.name,
        };

        let brand = self
            .service
            .create_brand(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(brand_to_proto(&brand)))
    }

    async fn get_brand(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<BrandResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        let brand = self.service.get_brand(&ctx, id).await.map_err(Status::from)?;
        Ok(Response::new(brand_to_proto(&brand)))
    }

    async fn list_brands(
        &self,
        request: Request<ListRequest>,
    ) -> Result<Response<ListBrandsResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;

        let brands = self.service.list_brands(&ctx).await.map_err(Status::from)?;
        let total = brands.len() as i32;
        let brands = brands.iter().map(brand_to_proto).collect();

        Ok(Response::new(ListBrandsResponse { brands, total }))
    }

    async fn update_brand(
        &self,
        request: Request<UpdateBrandRequest>,
    ) -> Result<Response<BrandResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let brand = self
            .service
            .update_brand(&ctx, req.id, UpdateBrand { name: req.name })
            .await
            .map_err(Status::from)?;
        Ok(Response::new(brand_to_proto(&brand)))
    }

    async fn delete_brand(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        self.service
            .delete_brand(&ctx, id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteResponse {
            success: true,
            affected: 1,
        }))
    }
}
