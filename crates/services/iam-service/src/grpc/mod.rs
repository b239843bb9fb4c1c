//! gRPC adapters, one per proto service.

mod auth_grpc;
mod brand_grpc;
mod context;
mod convert;
mod role_grpc;
mod tenant_grpc;
mod user_grpc;

pub use auth_grpc::AuthGrpcService;
pub use brand_grpc::BrandGrpcService;
pub use context::{bearer_token, tenant_override};
pub use role_grpc::RoleGrpcService;
pub use tenant_grpc::TenantGrpcService;
pub use user_grpc::UserGrpcService;
