//! Role domain entity and related types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::Audit;

/// Role domain entity
///
/// `code` is derived from the tenant and the name at creation and never
/// changes afterwards, even when the role is renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub priority: i32,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Role creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    pub tenant_id: Option<i64>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Role update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}
