use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use inkpost::{
    api::{shutdown_signal, start_api_server, ApiState},
    observability::{init_observability, log_config_info},
    registry::RegistryClient,
    storage::InMemoryArticleRepository,
    AppConfig, Error, Result, APP_NAME, VERSION,
};
use tokio::sync::oneshot;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "inkpost", version, about = "Article management service")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON); environment variables still override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists, before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    init_observability(&config.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting inkpost article service");
    log_config_info(&config);

    let state = ApiState::new(Arc::new(InMemoryArticleRepository::new()));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(start_api_server(config.server.clone(), state, async move {
        let _ = stop_rx.await;
    }));

    // Registration retries in the background so a slow registry never blocks serving
    let registry = Arc::new(RegistryClient::new(config.registry.clone())?);
    let registration = {
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(e) = registry.start().await {
                error!(error = %e, "Service registry registration failed");
            }
        })
    };

    let finished_early = tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            None
        }
        joined = &mut server => Some(joined),
    };

    registry.stop().await;
    if let Err(e) = registration.await {
        error!(error = %e, "Registration task failed");
    }

    let joined = match finished_early {
        Some(joined) => joined,
        None => {
            let _ = stop_tx.send(());
            server.await
        }
    };

    joined.map_err(|e| Error::internal(format!("API server task failed: {}", e)))?
}
