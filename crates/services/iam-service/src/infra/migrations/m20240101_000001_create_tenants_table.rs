//! Migration: Create tenants table.

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
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(id_column(Tenants::Id))
                        .col(ColumnDef::new(Tenants::Name).string().not_null())
                        .col(ColumnDef::new(Tenants::Slug).string().not_null().unique_key())
                        .col(ColumnDef::new(Tenants::Domain).string().null().unique_key())
                        .col(
                            ColumnDef::new(Tenants::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Tenants::Settings).json_binary().not_null())
                        .col(ColumnDef::new(Tenants::Metadata).json_binary().not_null())
                        .col(
                            ColumnDef::new(Tenants::ExpiresAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Tenants::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        ),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}
