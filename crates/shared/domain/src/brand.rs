//! Brand domain entity and related types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::Audit;

/// Brand domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Brand creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrand {
    pub tenant_id: Option<i64>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

/// Brand update data transfer object (the code is immutable)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrand {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
}
