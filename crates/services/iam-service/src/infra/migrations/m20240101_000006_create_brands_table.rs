//! Migration: Create brands table.

use sea_orm_migration::prelude::*;

use super::{id_column, with_audit_columns, Tenants};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Brands::Table)
                        .if_not_exists()
                        .col(id_column(Brands::Id))
                        .col(ColumnDef::new(Brands::TenantId).big_integer().not_null())
                        .col(ColumnDef::new(Brands::Name).string().not_null())
                        .col(ColumnDef::new(Brands::Code).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_brands_tenant_id")
                                .from(Brands::Table, Brands::TenantId)
                                .to(Tenants::Table, Tenants::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_brands_tenant_code")
                    .table(Brands::Table)
                    .col(Brands::TenantId)
                    .col(Brands::Code)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Brands {
    Table,
    Id,
    TenantId,
    Name,
    Code,
}
