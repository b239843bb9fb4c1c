//! Brand database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Brand, Resource};

use crate::hooks::{current, pending, set_if_unset, take_pending, Audited, Guarded, TenantScoped};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub owned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::stamp_timestamps(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

impl TenantScoped for ActiveModel {
    fn tenant_id(&self) -> Option<i64> {
        pending(&self.tenant_id).copied()
    }

    fn set_tenant_id(&mut self, tenant_id: i64) {
        self.tenant_id = Set(tenant_id);
    }

    fn code_source(&self) -> Option<&str> {
        pending(&self.name).map(String::as_str)
    }

    fn set_code(&mut self, code: String) {
        self.code = Set(code);
    }

    fn take_pending_code(&mut self) -> Option<String> {
        take_pending(&mut self.code)
    }
}

impl Audited for ActiveModel {
    fn stamp_creator(&mut self, user_id: i64) {
        set_if_unset(&mut self.created_by, Some(user_id));
        set_if_unset(&mut self.owned_by, Some(user_id));
    }
}

impl Guarded for ActiveModel {
    const RESOURCE: Resource = Resource::Brand;

    fn owning_tenant(&self) -> Option<i64> {
        current(&self.tenant_id).copied()
    }
}

impl From<Model> for Brand {
    fn from(model: Model) -> Self {
        Brand {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            code: model.code,
            audit: super::audit_of(
                model.created_at,
                model.updated_at,
                model.created_by,
                model.owned_by,
            ),
        }
    }
}
