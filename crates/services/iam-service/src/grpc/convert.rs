//! Conversions between domain types and proto messages.

use chrono::{DateTime, Utc};
use tonic::Status;

use common::AppError;
use domain::{
    Audit, Brand, Permission, PermissionGrant, Role, RolePermission, Tenant, TenantStatus, User,
};
use proto::iam;

pub(crate) fn audit_to_proto(audit: &Audit) -> Option<iam::Audit> {
    Some(iam::Audit {
        created_at: audit.created_at.to_rfc3339(),
        updated_at: audit.updated_at.to_rfc3339(),
        created_by: audit.created_by,
        owned_by: audit.owned_by,
    })
}

pub(crate) fn tenant_to_proto(tenant: &Tenant) -> iam::TenantResponse {
    iam::TenantResponse {
        id: tenant.id,
        name: tenant.name.clone(),
        slug: tenant.slug.clone(),
        domain: tenant.domain.clone(),
        status: tenant.status.to_string(),
        settings: tenant.settings.to_string(),
        metadata: tenant.metadata.to_string(),
        expires_at: tenant.expires_at.map(|t| t.to_rfc3339()),
        is_active: tenant.is_active,
        audit: audit_to_proto(&tenant.audit),
    }
}

pub(crate) fn user_to_proto(user: &User) -> iam::UserResponse {
    iam::UserResponse {
        id: user.id,
        tenant_id: user.tenant_id,
        email: user.email.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        user_type: user.user_type.to_string(),
        role_id: user.role_id,
        audit: audit_to_proto(&user.audit),
    }
}

pub(crate) fn role_to_proto(role: &Role) -> iam::RoleResponse {
    iam::RoleResponse {
        id: role.id,
        tenant_id: role.tenant_id,
        name: role.name.clone(),
        code: role.code.clone(),
        priority: role.priority,
        is_active: role.is_active,
        audit: audit_to_proto(&role.audit),
    }
}

pub(crate) fn permission_to_proto(permission: &Permission) -> iam::PermissionResponse {
    iam::PermissionResponse {
        id: permission.id,
        name: permission.name.clone(),
        resource: permission.resource.clone(),
        description: permission.description.clone(),
        is_active: permission.is_active,
        audit: audit_to_proto(&permission.audit),
    }
}

pub(crate) fn grant_to_proto(grant: PermissionGrant) -> iam::Grant {
    iam::Grant {
        can_read: grant.can_read,
        can_create: grant.can_create,
        can_update: grant.can_update,
        can_delete: grant.can_delete,
    }
}

/// A missing grant message grants nothing.
pub(crate) fn grant_from_proto(grant: Option<iam::Grant>) -> PermissionGrant {
    grant
        .map(|g| PermissionGrant {
            can_read: g.can_read,
            can_create: g.can_create,
            can_update: g.can_update,
            can_delete: g.can_delete,
        })
        .unwrap_or_default()
}

pub(crate) fn role_permission_to_proto(grant: &RolePermission) -> iam::RolePermissionResponse {
    iam::RolePermissionResponse {
        id: grant.id,
        tenant_id: grant.tenant_id,
        role_id: grant.role_id,
        permission_id: grant.permission_id,
        grant: Some(grant_to_proto(grant.grant)),
        audit: audit_to_proto(&grant.audit),
    }
}

pub(crate) fn brand_to_proto(brand: &Brand) -> iam::BrandResponse {
    iam::BrandResponse {
        id: brand.id,
        tenant_id: brand.tenant_id,
        name: brand.name.clone(),
        code: brand.code.clone(),
        audit: audit_to_proto(&brand.audit),
    }
}

pub(crate) fn parse_json(field: &str, value: Option<String>) -> Result<Option<serde_json::Value>, Status> {
    value
        .map(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| Status::invalid_argument(format!("Invalid {} JSON: {}", field, e)))
        })
        .transpose()
}

pub(crate) fn parse_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>, Status> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| Status::invalid_argument("Timestamps must be RFC 3339"))
        })
        .transpose()
}

pub(crate) fn parse_status(value: Option<String>) -> Result<Option<TenantStatus>, Status> {
    value
        .map(|raw| raw.parse::<TenantStatus>().map_err(|e| Status::from(AppError::from(e))))
        .transpose()
}
