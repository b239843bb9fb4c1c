//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Types
// =============================================================================

/// Platform operator spanning every tenant
pub const USER_TYPE_SUPER_ADMIN: &str = "super_admin";

/// Administrator of a single tenant
pub const USER_TYPE_ADMIN: &str = "admin";

/// Default type assigned to new users
pub const USER_TYPE_USER: &str = "user";

/// All valid user type values
pub const VALID_USER_TYPES: &[&str] = &[USER_TYPE_SUPER_ADMIN, USER_TYPE_ADMIN, USER_TYPE_USER];

/// Check if a user type value is valid
pub fn is_valid_user_type(user_type: &str) -> bool {
    VALID_USER_TYPES.contains(&user_type)
}

// =============================================================================
// Tenant Status
// =============================================================================

pub const TENANT_STATUS_ACTIVE: &str = "active";
pub const TENANT_STATUS_INACTIVE: &str = "inactive";
pub const TENANT_STATUS_SUSPENDED: &str = "suspended";
pub const TENANT_STATUS_PENDING: &str = "pending";

// =============================================================================
// Codes
// =============================================================================

/// Prefix of every generated code
pub const CODE_TENANT_PREFIX: &str = "tenant";

/// Separator between the tenant part and the normalized name
pub const CODE_SEGMENT: &str = "code";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Username length bounds (characters)
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 366;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Metadata key a super admin uses to act inside another tenant
pub const TENANT_OVERRIDE_METADATA_KEY: &str = "x-tenant-id";
