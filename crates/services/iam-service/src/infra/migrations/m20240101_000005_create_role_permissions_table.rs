//! Migration: Create role_permissions table.

use sea_orm_migration::prelude::*;

use super::{id_column, with_audit_columns, Permissions, Roles, Tenants};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(RolePermissions::Table)
                        .if_not_exists()
                        .col(id_column(RolePermissions::Id))
                        .col(
                            ColumnDef::new(RolePermissions::TenantId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RolePermissions::RoleId).big_integer().not_null())
                        .col(
                            ColumnDef::new(RolePermissions::PermissionId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(flag(RolePermissions::CanRead))
                        .col(flag(RolePermissions::CanCreate))
                        .col(flag(RolePermissions::CanUpdate))
                        .col(flag(RolePermissions::CanDelete))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_role_permissions_tenant_id")
                                .from(RolePermissions::Table, RolePermissions::TenantId)
                                .to(Tenants::Table, Tenants::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_role_permissions_role_id")
                                .from(RolePermissions::Table, RolePermissions::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_role_permissions_permission_id")
                                .from(RolePermissions::Table, RolePermissions::PermissionId)
                                .to(Permissions::Table, Permissions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // One grant row per (role, permission)
        manager
            .create_index(
                Index::create()
                    .name("idx_role_permissions_role_permission")
                    .table(RolePermissions::Table)
                    .col(RolePermissions::RoleId)
                    .col(RolePermissions::PermissionId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
            .await
    }
}

fn flag(column: RolePermissions) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[derive(Iden)]
enum RolePermissions {
    Table,
    Id,
    TenantId,
    RoleId,
    PermissionId,
    CanRead,
    CanCreate,
    CanUpdate,
    CanDelete,
}
