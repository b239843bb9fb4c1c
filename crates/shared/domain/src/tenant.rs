//! Tenant domain entity and related types.
//!
//! A tenant is the isolation boundary: users, roles, grants and brands all
//! carry the id of the tenant they belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::Audit;
use crate::constants::{
    TENANT_STATUS_ACTIVE, TENANT_STATUS_INACTIVE, TENANT_STATUS_PENDING, TENANT_STATUS_SUSPENDED,
};
use crate::error::DomainError;
use crate::validation::validate_slug;

/// Lifecycle state of a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => TENANT_STATUS_ACTIVE,
            TenantStatus::Inactive => TENANT_STATUS_INACTIVE,
            TenantStatus::Suspended => TENANT_STATUS_SUSPENDED,
            TenantStatus::Pending => TENANT_STATUS_PENDING,
        }
    }
}

impl std::str::FromStr for TenantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TENANT_STATUS_ACTIVE => Ok(TenantStatus::Active),
            TENANT_STATUS_INACTIVE => Ok(TenantStatus::Inactive),
            TENANT_STATUS_SUSPENDED => Ok(TenantStatus::Suspended),
            TENANT_STATUS_PENDING => Ok(TenantStatus::Pending),
            other => Err(DomainError::validation(format!(
                "Unknown tenant status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub status: TenantStatus,
    pub settings: serde_json::Value,
    pub metadata: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Tenant {
    /// Check whether the tenant has passed its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// A tenant accepts logins only while active, flagged on and unexpired
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.status == TenantStatus::Active && !self.is_expired(now)
    }
}

/// Tenant creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenant {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Domain cannot be empty"))]
    pub domain: Option<String>,
    pub status: Option<TenantStatus>,
    pub settings: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Tenant update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTenant {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub settings: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tenant() -> Tenant {
        Tenant {
            id: 1,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            domain: None,
            status: TenantStatus::Active,
            settings: serde_json::json!({}),
            metadata: serde_json::json!({}),
            expires_at: None,
            is_active: true,
            audit: Audit::now(None),
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            TenantStatus::Active,
            TenantStatus::Inactive,
            TenantStatus::Suspended,
            TenantStatus::Pending,
        ] {
            assert_eq!(status.as_str().parse::<TenantStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<TenantStatus>().is_err());
    }

    #[test]
    fn test_usable_tenant() {
        assert!(tenant().is_usable(Utc::now()));
    }

    #[test]
    fn test_suspended_tenant_is_not_usable() {
        let mut t = tenant();
        t.status = TenantStatus::Suspended;
        assert!(!t.is_usable(Utc::now()));
    }

    #[test]
    fn test_expired_tenant_is_not_usable() {
        let mut t = tenant();
        t.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(t.is_expired(Utc::now()));
        assert!(!t.is_usable(Utc::now()));
    }

    #[test]
    fn test_create_tenant_rejects_bad_slug() {
        let input = CreateTenant {
            name: "Acme".to_string(),
            slug: "Acme Inc".to_string(),
            domain: None,
            status: None,
            settings: None,
            metadata: None,
            expires_at: None,
        };
        assert!(input.validate().is_err());
    }
}
