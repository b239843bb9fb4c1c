//! Permissions and their assignment to roles.
//!
//! Permissions are global: a permission names a resource, and a
//! [`RolePermission`] row decides which actions a role may perform on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::Audit;
use crate::policy::Action;

/// Permission domain entity (not tenant-scoped)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Per-action flags of a role/permission pair. Everything defaults to denied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub can_read: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl PermissionGrant {
    /// Grant every action
    pub fn all() -> Self {
        Self {
            can_read: true,
            can_create: true,
            can_update: true,
            can_delete: true,
        }
    }

    /// Read-only grant
    pub fn read_only() -> Self {
        Self {
            can_read: true,
            ..Self::default()
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.can_read,
            Action::Create => self.can_create,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
        }
    }

    /// Union of two grants on the same resource
    pub fn merge(self, other: PermissionGrant) -> Self {
        Self {
            can_read: self.can_read || other.can_read,
            can_create: self.can_create || other.can_create,
            can_update: self.can_update || other.can_update,
            can_delete: self.can_delete || other.can_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Effective grants of a principal, keyed by resource name.
pub type Grants = HashMap<String, PermissionGrant>;

/// Fold `(resource, grant)` pairs into per-resource grants.
///
/// Several permissions may target the same resource; their flags are merged.
pub fn merge_grants<I>(pairs: I) -> Grants
where
    I: IntoIterator<Item = (String, PermissionGrant)>,
{
    let mut grants = Grants::new();
    for (resource, grant) in pairs {
        grants
            .entry(resource)
            .and_modify(|existing| *existing = existing.merge(grant))
            .or_insert(grant);
    }
    grants
}

/// A role's grant on one permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: i64,
    pub tenant_id: i64,
    pub role_id: i64,
    pub permission_id: i64,
    #[serde(flatten)]
    pub grant: PermissionGrant,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Permission creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermission {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Resource cannot be empty"))]
    pub resource: String,
    pub description: Option<String>,
}

/// Grant (or re-grant) a permission to a role
#[derive(Debug, Clone, Deserialize)]
pub struct GrantPermission {
    pub tenant_id: Option<i64>,
    pub role_id: i64,
    pub permission_id: i64,
    pub grant: PermissionGrant,
}
