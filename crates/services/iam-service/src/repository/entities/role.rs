//! Role database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Resource, Role};

use crate::hooks::{current, pending, set_if_unset, take_pending, Audited, Guarded, TenantScoped};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub owned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    User,
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermission,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::role_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermission.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            priority: Set(0),
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
    const RESOURCE: Resource = Resource::Role;

    fn owning_tenant(&self) -> Option<i64> {
        current(&self.tenant_id).copied()
    }
}

impl From<Model> for Role {
    fn from(model: Model) -> Self {
        Role {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            code: model.code,
            priority: model.priority,
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
