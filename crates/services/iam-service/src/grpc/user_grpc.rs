//! gRPC implementation for UserService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::context::resolve;
use super::convert::user_to_proto;
use crate::service::{AuthService, UserService};
use domain::{CreateUser, UpdateUser};
use proto::iam::{
    user_service_server::UserService as UserServiceProto, CreateUserRequest, DeleteResponse,
    IdRequest, ListRequest, ListUsersResponse, UpdateUserRequest, UserResponse,
};

pub struct UserGrpcService {
    service: Arc<dyn UserService>,
    auth: Arc<dyn AuthService>,
}

impl UserGrpcService {
    pub fn new(service: Arc<dyn UserService>, auth: Arc<dyn AuthService>) -> Self {
        Self { service, auth }
    }
}

/// `role_id` wins over `clear_role`.
fn role_change(role_id: Option<i64>, clear_role: bool) -> Option<Option<i64>> {
    match (role_id, clear_role) {
        (Some(id), _) => Some(Some(id)),
        (None, true) => Some(None),
        (None, false) => None,
    }
}

#[tonic::async_trait]
impl UserServiceProto for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = CreateUser {
            tenant_id: req.tenant_id,
            email: req.email,
            username: req.username,
            password: req.password,
            name: req.name,
            user_type: req.user_type,
            role_id: req.role_id,
        };

        let user = self
            .service
            .create_user(&ctx, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn get_user(&self, request: Request<IdRequest>) -> Result<Response<UserResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        let user = self.service.get_user(&ctx, id).await.map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn list_users(
        &self,
        request: Request<ListRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;

        let users = self.service.list_users(&ctx).await.map_err(Status::from)?;
        let total = users.len() as i32;
        let users = users.iter().map(user_to_proto).collect();

        Ok(Response::new(ListUsersResponse { users, total }))
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let req = request.into_inner();

        let input = UpdateUser {
            name: req.name,
            user_type: req.user_type,
            role_id: role_change(req.role_id, req.clear_role),
            password: req.password,
        };

        let user = self
            .service
            .update_user(&ctx, req.id, input)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn delete_user(
        &self,
        request: Request<IdRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let ctx = resolve(self.auth.as_ref(), &request).await?;
        let id = request.into_inner().id;

        self.service
            .delete_user(&ctx, id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteResponse {
            success: true,
            affected: 1,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MockAuthService, MockUserService};
    use common::AppError;
    use domain::RequestContext;

    #[test]
    fn test_role_change() {
        assert_eq!(role_change(Some(3), true), Some(Some(3)));
        assert_eq!(role_change(None, true), Some(None));
        assert_eq!(role_change(None, false), None);
    }

    #[tokio::test]
    async fn test_missing_tenant_surfaces_as_failed_precondition() {
        let mut auth = MockAuthService::new();
        auth.expect_resolve_context()
            .returning(|_, _| Ok(RequestContext::system()));
        let mut users = MockUserService::new();
        users
            .expect_list_users()
            .returning(|_| Err(AppError::MissingTenantContext));

        let grpc = UserGrpcService::new(Arc::new(users), Arc::new(auth));
        let status = grpc
            .list_users(Request::new(ListRequest {}))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_bad_token_stops_before_service() {
        let mut auth = MockAuthService::new();
        auth.expect_resolve_context()
            .returning(|_, _| Err(AppError::Unauthorized));
        let mut users = MockUserService::new();
        users.expect_get_user().never();

        let grpc = UserGrpcService::new(Arc::new(users), Arc::new(auth));
        let mut request = Request::new(IdRequest { id: 1 });
        request
            .metadata_mut()
            .insert("authorization", "Bearer expired".parse().unwrap());

        let status = grpc.get_user(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }
}
