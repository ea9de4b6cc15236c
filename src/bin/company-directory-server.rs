use anyhow::Result;
use company_directory::{load_config, prepare_storage};
use directory_api::AppState;
use directory_catalog::Catalog;
use directory_metrics::{MetricsService, TracingService};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    TracingService::init().map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting Company Directory server");

    let config = load_config()?;
    TracingService::log_config(&config);

    prepare_storage(&config)?;

    let options = SqliteConnectOptions::from_str(&config.data.db_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!("Database connected");

    let catalog = Catalog::new(pool).await?;

    if config.seed.enabled {
        match catalog.seed_if_empty().await {
            Ok(true) => info!("Seeded demo data"),
            Ok(false) => info!("Database already populated, skipping seed"),
            Err(e) => error!("Failed to seed demo data: {}", e),
        }
    }

    let metrics = Arc::new(MetricsService::new()?);
    let state = AppState::new(config, Arc::new(catalog), metrics);

    directory_api::start_server(state, shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Company Directory server shutdown complete");
    Ok(())
}
