//! SeaORM entities.
//!
//! Each entity's `ActiveModel` doubles as the pending-mutation object of the
//! hook pipeline and implements the hook capabilities it supports.

pub mod brand;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod tenant;
pub mod user;

use sea_orm::entity::prelude::DateTimeUtc;
use sea_orm::{ActiveValue, Set};

use domain::Audit;

/// Stamp `created_at` on insert and `updated_at` on every save.
pub(crate) fn stamp_timestamps(
    created_at: &mut ActiveValue<DateTimeUtc>,
    updated_at: &mut ActiveValue<DateTimeUtc>,
    insert: bool,
) {
    let now = chrono::Utc::now();
    if insert && created_at.is_not_set() {
        *created_at = Set(now);
    }
    *updated_at = Set(now);
}

pub(crate) fn audit_of(
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
    created_by: Option<i64>,
    owned_by: Option<i64>,
) -> Audit {
    Audit {
        created_at,
        updated_at,
        created_by,
        owned_by,
    }
}
