//! gRPC implementation for RoleService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::context::resolve;
use super::convert::{grant_from_proto, permission_to_proto, role_permission_to_proto, role_to_proto};
use crate::service::{AuthService, RoleService};
use domain::{CreatePermission, CreateRole, GrantPermission, UpdateRole};
use proto::iam::{
    role_service_server::RoleService as RoleServiceProto, CreatePermissionRequest,
    CreateRoleRequest, DeleteResponse, GrantPermissionRequest, IdRequest, ListPermissionsResponse,
    ListRequest, ListRolePermissionsResponse, ListRolesResponse, PermissionResponse,
    RevokePermissionRequest, RolePermissionResponse, RoleResponse, UpdateRoleRequest,
};

pub struct RoleGrpcService {
    service: Arc<dyn RoleService>,
    auth: Arc<dyn AuthService>,
}

impl RoleGrpcService {
    pub fn new(service: Arc<dyn RoleService>, auth: Arc<dyn AuthService>) -> Self {
        Self { service, auth }
    }
}

#[tonic::async_trait]
impl RoleServiceProto for RoleGrpcService {
    async fn create_role(
        &self,
        request: Request<CreateRoleRequest>,
    ) -> Result<Response<RoleResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = CreateRole {
            tenant_id: req.tenant_id,
            name: req.name,
            priority: req.priority,
            is_active: req.is_active,
        };

        let role = self
            .service
            .create_role(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(role_to_proto(&role)))
    }

    async fn get_role(&self, request: Request<IdRequest>) -> Result<Response<RoleResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        let role = self.service.get_role(&ctx, id).await.map_err(Status::from)?;
        Ok(Response::new(role_to_proto(&role)))
    }

    async fn list_roles(
        &self,
        request: Request<ListRequest>,
    ) -> Result<Response<ListRolesResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;

        let roles = self.service.list_roles(&ctx).await.map_err(Status::from)?;
        let total = roles.len() as i32;
        let roles = roles.iter().map(role_to_proto).collect();

        Ok(Response::new(ListRolesResponse { roles, total }))
    }

    async fn update_role(
        &self,
        request: Request<UpdateRoleRequest>,
    ) -> Result<Response<RoleResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = UpdateRole {
            name: req.name,
            priority: req.priority,
            is_active: req.is_active,
        };

        let role = self
            .service
            .update_role(&ctx, req.id, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(role_to_proto(&role)))
    }

    /// `affected` counts the role plus the grants and user links removed with it.
    async fn delete_role(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        let removal = self
            .service
            .delete_role(&ctx, id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteResponse {
            success: true,
            affected: 1 + removal.grants_revoked + removal.users_detached,
        }))
    }

    async fn create_permission(
        &self,
        request: Request<CreatePermissionRequest>,
    ) -> Result<Response<PermissionResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = CreatePermission {
            name: req.name,
            resource: req.resource,
            description: req.description,
        };

        let permission = self
            .service
            .create_permission(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(permission_to_proto(&permission)))
    }

    async fn list_permissions(
        &self,
        request: Request<ListRequest>,
    ) -> Result<Response<ListPermissionsResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;

        let permissions = self
            .service
            .list_permissions(&ctx)
            .await
            .map_err(Status::from)?;
        let total = permissions.len() as i32;
        let permissions = permissions.iter().map(permission_to_proto).collect();

        Ok(Response::new(ListPermissionsResponse { permissions, total }))
    }

    async fn grant_permission(
        &self,
        request: Request<GrantPermissionRequest>,
    ) -> Result<Response<RolePermissionResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = GrantPermission {
            tenant_id: req.tenant_id,
            role_id: req.role_id,
            permission_id: req.permission_id,
            grant: grant_from_proto(req.grant),
        };

        let granted = self
            .service
            .grant_permission(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(role_permission_to_proto(&granted)))
    }

    async fn revoke_permission(
        &self,
        request: Request<RevokePermissionRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let removed = self
            .service
            .revoke_permission(&ctx, req.role_id, req.permission_id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteResponse {
            success: removed,
            affected: u64::from(removed),
        }))
    }

    async fn list_role_permissions(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<ListRolePermissionsResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let role_id = request.into_inner().id;

        let grants = self
            .service
            .list_role_permissions(&ctx, role_id)
            .await
            .map_err(Status::from)?;
        let total = grants.len() as i32;
        let grants = grants.iter().map(role_permission_to_proto).collect();

        Ok(Response::new(ListRolePermissionsResponse { grants, total }))
    }
}
