//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tenants_table;
mod m20240101_000002_create_permissions_table;
mod m20240101_000003_create_roles_table;
mod m20240101_000004_create_users_table;
mod m20240101_000005_create_role_permissions_table;
mod m20240101_000006_create_brands_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_tenants_table::Migration),
            Box::new(m20240101_000002_create_permissions_table::Migration),
            Box::new(m20240101_000003_create_roles_table::Migration),
            Box::new(m20240101_000004_create_users_table::Migration),
            Box::new(m20240101_000005_create_role_permissions_table::Migration),
            Box::new(m20240101_000006_create_brands_table::Migration),
        ]
    }
}

/// Columns shared by every table.
#[derive(Iden)]
pub(crate) enum AuditColumns {
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    OwnedBy,
}

pub(crate) fn id_column<T: IntoIden>(id: T) -> ColumnDef {
    ColumnDef::new(id)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// Append the audit columns to a table definition.
pub(crate) fn with_audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(AuditColumns::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(AuditColumns::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(AuditColumns::CreatedBy).big_integer().null())
        .col(ColumnDef::new(AuditColumns::OwnedBy).big_integer().null())
}

#[derive(Iden)]
pub(crate) enum Tenants {
    Table,
    Id,
    Name,
    Slug,
    Domain,
    Status,
    Settings,
    Metadata,
    ExpiresAt,
    IsActive,
}

#[derive(Iden)]
pub(crate) enum Permissions {
    Table,
    Id,
    Name,
    Resource,
    Description,
    IsActive,
}

#[derive(Iden)]
pub(crate) enum Roles {
    Table,
    Id,
    TenantId,
    Name,
    Code,
    Priority,
    IsActive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_by_dependency() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }
}
