//! Permission catalog entity. Permissions are global, not tenant-scoped.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Permission, Resource};

use crate::hooks::{set_if_unset, Audited, Guarded};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub resource: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub owned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermission,
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
    const RESOURCE: Resource = Resource::Permission;

    fn owning_tenant(&self) -> Option<i64> {
        None
    }
}

impl From<Model> for Permission {
    fn from(model: Model) -> Self {
        Permission {
            id: model.id,
            name: model.name,
            resource: model.resource,
            description: model.description,
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
