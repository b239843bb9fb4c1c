//! Domain layer - Core business entities, rules and value objects.
//!
//! This crate contains pure domain logic with no infrastructure
//! dependencies: entity types, validated DTOs, deterministic code
//! generation, the request context and the authorization policies.

pub mod audit;
pub mod brand;
pub mod code;
pub mod constants;
pub mod context;
pub mod error;
pub mod password;
pub mod permission;
pub mod policy;
pub mod role;
pub mod tenant;
pub mod user;
pub mod validation;

pub use audit::Audit;
pub use brand::{Brand, CreateBrand, UpdateBrand};
pub use code::generate_code;
pub use constants::*;
pub use context::{Actor, Principal, RequestContext};
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use permission::{
    merge_grants, CreatePermission, GrantPermission, Grants, Permission, PermissionGrant,
    RolePermission,
};
pub use policy::{Action, Decision, Policy, Resource, Subject};
pub use role::{CreateRole, Role, UpdateRole};
pub use tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant};
pub use user::{CreateUser, UpdateUser, User, UserType};
