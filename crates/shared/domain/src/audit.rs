//! Audit fields shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation/modification bookkeeping attached to every stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// User that created the row (None for system writes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    /// User that currently owns the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<i64>,
}

impl Audit {
    /// Fresh audit block for an entity created now.
    pub fn now(created_by: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            created_by,
            owned_by: created_by,
        }
    }
}
