//! IAM Service Library
//!
//! Multi-tenant identity and access management over gRPC: tenants, users,
//! roles with permission grants, and brands. Every write runs through a
//! per-entity hook pipeline that scopes it to a tenant, derives generated
//! codes and enforces the entity's policy.

pub mod config;
pub mod grpc;
pub mod hooks;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::config::IamServiceConfig;
use crate::grpc::{
    AuthGrpcService, BrandGrpcService, RoleGrpcService, TenantGrpcService, UserGrpcService,
};
use crate::infra::Database;
use crate::repository::{
    BrandStore, PermissionStore, RolePermissionStore, RoleStore, TenantStore, UserStore,
};
use crate::service::{
    AuthManager, AuthService, BrandManager, RoleManager, RoleService, TenantManager, UserManager,
};

/// Run the IAM service with configuration from the environment.
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = IamServiceConfig::from_env();
    config.validate()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = IamServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for migration in db.migration_status().await? {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration actions, also the `migrate` subcommands of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::Subcommand)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up,
    /// Roll back the last applied migration
    Down,
    /// List migrations and whether each is applied
    Status,
    /// Drop every table and migrate from scratch
    Fresh,
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: IamServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let conn = db.get_connection();

    // Repositories
    let tenant_repo = Arc::new(TenantStore::new(conn.clone()));
    let user_repo = Arc::new(UserStore::new(conn.clone()));
    let role_repo = Arc::new(RoleStore::new(conn.clone()));
    let permission_repo = Arc::new(PermissionStore::new(conn.clone()));
    let grant_repo = Arc::new(RolePermissionStore::new(conn.clone()));
    let brand_repo = Arc::new(BrandStore::new(conn));

    // Services
    let role_service: Arc<dyn RoleService> = Arc::new(RoleManager::new(
        role_repo.clone(),
        permission_repo,
        grant_repo,
        user_repo.clone(),
    ));
    let auth_service: Arc<dyn AuthService> = Arc::new(AuthManager::new(
        user_repo.clone(),
        tenant_repo.clone(),
        role_service.clone(),
        config.jwt.clone(),
    ));
    let tenant_service = Arc::new(TenantManager::new(tenant_repo));
    let user_service = Arc::new(UserManager::new(user_repo, role_repo));
    let brand_service = Arc::new(BrandManager::new(brand_repo));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(service = %config.service.service_name, "IAM service listening on {}", addr);

    Server::builder()
        .add_service(proto::AuthServiceServer::new(AuthGrpcService::new(
            auth_service.clone(),
        )))
        .add_service(proto::TenantServiceServer::new(TenantGrpcService::new(
            tenant_service,
            auth_service.clone(),
        )))
        .add_service(proto::UserServiceServer::new(UserGrpcService::new(
            user_service,
            auth_service.clone(),
        )))
        .add_service(proto::RoleServiceServer::new(RoleGrpcService::new(
            role_service,
            auth_service.clone(),
        )))
        .add_service(proto::BrandServiceServer::new(BrandGrpcService::new(
            brand_service,
            auth_service,
        )))
        .serve(addr)
        .await?;

    Ok(())
}
