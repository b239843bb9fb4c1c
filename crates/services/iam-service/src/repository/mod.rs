//! Repository layer for data access.
//!
//! Reads go straight to the database and, for tenant-owned entities, always
//! filter by tenant. Writes are handed to the entity's hook [`Pipeline`].
//!
//! [`Pipeline`]: crate::hooks::Pipeline

pub mod entities;
mod brand_repository;
mod permission_repository;
mod role_permission_repository;
mod role_repository;
mod tenant_repository;
mod user_repository;

pub use brand_repository::{BrandRepository, BrandStore};
pub use permission_repository::{PermissionRepository, PermissionStore};
pub use role_permission_repository::{RolePermissionRepository, RolePermissionStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use tenant_repository::{TenantRepository, TenantStore};
pub use user_repository::{NewUser, UserChanges, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use brand_repository::MockBrandRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use permission_repository::MockPermissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_permission_repository::MockRolePermissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_repository::MockTenantRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use sea_orm::ActiveValue;

/// `Set` when a value is given, otherwise leave the column out of the write.
pub(crate) fn set_some<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    match value {
        Some(v) => ActiveValue::Set(v),
        None => ActiveValue::NotSet,
    }
}
