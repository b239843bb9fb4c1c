//! `iam-service` binary: serves the gRPC API or manages the schema.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use iam_service_lib::config::IamServiceConfig;
use iam_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "iam-service", version)]
#[command(about = "Multi-tenant identity and access management service")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "IAM_SERVICE_LOG", default_value = "info")]
    log: String,

    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the gRPC server
    Serve(ServeArgs),
    /// Manage the database schema
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Validate the environment configuration and exit
    CheckConfig,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "IAM_SERVICE_HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "IAM_SERVICE_PORT", default_value_t = 50051)]
    port: u16,
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Some(Command::Serve(args)) => iam_service_lib::run_embedded(&args.host, args.port).await?,
        None => {
            let config = IamServiceConfig::from_env();
            iam_service_lib::run_embedded(&config.service.host, config.service.port).await?
        }
        Some(Command::Migrate { action }) => iam_service_lib::run_migrations(action).await?,
        Some(Command::CheckConfig) => {
            let config = IamServiceConfig::from_env();
            config.validate()?;
            tracing::info!(
                host = %config.service.host,
                port = config.service.port,
                max_connections = config.database.max_connections,
                jwt_expiration_hours = config.jwt.expiration_hours,
                "Configuration is valid"
            );
        }
    }

    Ok(())
}
