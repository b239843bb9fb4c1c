//! gRPC implementation for AuthService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::AuthService;
use proto::iam::{
    auth_service_server::AuthService as AuthServiceProto, LoginRequest, LoginResponse,
    VerifyTokenRequest, VerifyTokenResponse,
};

pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let token = self
            .service
            .login(req.identifier, req.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(LoginResponse {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }))
    }

    /// Invalid tokens answer `valid: false` rather than an error status.
    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let req = request.into_inner();

        let response = match self.service.verify_token(&req.token) {
            Ok(claims) => VerifyTokenResponse {
                valid: true,
                user_id: claims.sub,
                tenant_id: claims.tenant_id,
                user_type: claims.user_type,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                VerifyTokenResponse::default()
            }
        };

        Ok(Response::new(response))
    }
}
