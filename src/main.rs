//! DocSpace server: session, authentication, and access control core.
//!
//! Main entry point that loads configuration, initializes logging, opens
//! the configured storage backend, and serves the HTTP API.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use docspace_core::config::AppConfig;
use docspace_core::error::AppError;
use docspace_database::Repositories;

/// DocSpace server
#[derive(Debug, Parser)]
#[command(name = "docspace-server", version, about)]
struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`
    #[arg(long, env = "DOCSPACE_ENV", default_value = "development")]
    env: String,

    /// Override the configured listen port
    #[arg(long, env = "DOCSPACE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config);

    if let Err(e) = run(config, &cli.env).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(false)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig, env: &str) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env,
        database = %config.database.provider,
        "Starting DocSpace"
    );

    let repositories = Repositories::from_config(&config.database).await?;
    tracing::info!(backend = %repositories.backend(), "Storage ready");

    docspace_api::run_server(config, repositories).await
}
