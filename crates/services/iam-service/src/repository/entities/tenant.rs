//! Tenant database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Resource, Tenant, TenantStatus};

use crate::hooks::{current, set_if_unset, Audited, Guarded};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(unique)]
    pub domain: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub expires_at: Option<DateTimeUtc>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub owned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            status: Set(TenantStatus::Active.as_str().to_string()),
            settings: Set(serde_json::json!({})),
            metadata: Set(serde_json::json!({})),
            is_active: Set(true),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::stamp_timestamps(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

impl Audited for ActiveModel {
    fn stamp_creator(&mut self, user_id: i64) {
        set_if_unset(&mut self.created_by, Some(user_id));
        set_if_unset(&mut self.owned_by, Some(user_id));
    }
}

impl Guarded for ActiveModel {
    const RESOURCE: Resource = Resource::Tenant;

    // A tenant "belongs" to itself
    fn owning_tenant(&self) -> Option<i64> {
        current(&self.id).copied()
    }
}

/// Convert database model to domain entity
impl From<Model> for Tenant {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|_| {
            tracing::warn!(tenant_id = model.id, status = %model.status, "Unknown tenant status");
            TenantStatus::Inactive
        });

        Tenant {
            id: model.id,
            name: model.name,
            slug: model.slug,
            domain: model.domain,
            status,
            settings: model.settings,
            metadata: model.metadata,
            expires_at: model.expires_at,
            is_active: model.is_active,
            audit: super::audit_of(
                model.created_at,
                model.updated_at,
                model.created_by,
                model.owned_by,
            ),
        }
    }
}
