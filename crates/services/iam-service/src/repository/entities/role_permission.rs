//! Role to permission grant entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{PermissionGrant, Resource, RolePermission};

use crate::hooks::{current, pending, set_if_unset, Audited, Guarded, TenantScoped};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "role_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub role_id: i64,
    pub permission_id: i64,
    pub can_read: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub owned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "Cascade"
    )]
    Role,
    #[sea_orm(
        belongs_to = "super::permission::Entity",
        from = "Column::PermissionId",
        to = "super::permission::Column::Id",
        on_delete = "Cascade"
    )]
    Permission,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permission.def()
    }
}

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

impl ActiveModel {
    pub fn set_grant(&mut self, grant: PermissionGrant) {
        self.can_read = Set(grant.can_read);
        self.can_create = Set(grant.can_create);
        self.can_update = Set(grant.can_update);
        self.can_delete = Set(grant.can_delete);
    }
}

impl Model {
    pub fn grant(&self) -> PermissionGrant {
        PermissionGrant {
            can_read: self.can_read,
            can_create: self.can_create,
            can_update: self.can_update,
            can_delete: self.can_delete,
        }
    }
}

impl TenantScoped for ActiveModel {
    fn tenant_id(&self) -> Option<i64> {
        pending(&self.tenant_id).copied()
    }

    fn set_tenant_id(&mut self, tenant_id: i64) {
        self.tenant_id = Set(tenant_id);
    }
}

impl Audited for ActiveModel {
    fn stamp_creator(&mut self, user_id: i64) {
        set_if_unset(&mut self.created_by, Some(user_id));
        set_if_unset(&mut self.owned_by, Some(user_id));
    }
}

impl Guarded for ActiveModel {
    const RESOURCE: Resource = Resource::RolePermission;

    fn owning_tenant(&self) -> Option<i64> {
        current(&self.tenant_id).copied()
    }
}

impl From<Model> for RolePermission {
    fn from(model: Model) -> Self {
        let grant = model.grant();
        RolePermission {
            id: model.id,
            tenant_id: model.tenant_id,
            role_id: model.role_id,
            permission_id: model.permission_id,
            grant,
            audit: super::audit_of(
                model.created_at,
                model.updated_at,
                model.created_by,
                model.owned_by,
            ),
        }
    }
}
