//! Use cases.
//!
//! Services authorize reads against the resource policy themselves; writes
//! are authorized inside each entity's hook pipeline.

mod auth_service;
mod brand_service;
mod role_service;
mod tenant_service;
mod user_service;

pub use auth_service::{AuthManager, AuthService, Claims, TokenResponse};
pub use brand_service::{BrandManager, BrandService};
pub use role_service::{RoleManager, RoleRemoval, RoleService};
pub use tenant_service::{TenantManager, TenantService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use brand_service::MockBrandService;
#[cfg(any(test, feature = "test-utils"))]
pub use role_service::MockRoleService;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_service::MockTenantService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;

use validator::Validate;

use common::{AppError, AppResult};
use domain::{Action, DomainError, RequestContext, Resource, Subject};

/// Check `action` on `resource` within `tenant_id` against the resource policy.
pub(crate) fn authorize(
    ctx: &RequestContext,
    resource: Resource,
    action: Action,
    tenant_id: Option<i64>,
) -> AppResult<()> {
    resource
        .policy()
        .authorize(ctx.actor(), action, &Subject::new(resource, tenant_id))
        .map_err(AppError::from)
}

pub(crate) fn validate<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::from(DomainError::from_validation(&e)))
}
