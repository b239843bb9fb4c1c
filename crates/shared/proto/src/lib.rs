//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC service definitions for the IAM
//! service:
//! - AuthService: login and token-based identity
//! - TenantService: tenant registry
//! - UserService: tenant users
//! - RoleService: roles, the permission catalog and role grants
//! - BrandService: tenant brands

/// IAM service definitions.
pub mod iam {
    tonic::include_proto!("iam");
}

// Re-export commonly used items
pub use iam::auth_service_server::{AuthService, AuthServiceServer};
pub use iam::brand_service_server::{BrandService, BrandServiceServer};
pub use iam::role_service_server::{RoleService, RoleServiceServer};
pub use iam::tenant_service_server::{TenantService, TenantServiceServer};
pub use iam::user_service_server::{UserService, UserServiceServer};
