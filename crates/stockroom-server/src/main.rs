//! Stockroom Server - Main entry point

use anyhow::Result;
use std::{net::SocketAddr, time::Duration};
use stockroom_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tracing::info;

use stockroom_server::{
    api,
    config::{Config, StoreBackend},
    db,
    store::Stores,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("stockroom-server")
        .filter_directives("stockroom_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Stockroom Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let stores = match config.store {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            info!("Database connection pool established");
            Stores::postgres(pool)
        },
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Stores::memory()
        },
    };

    tokio::fs::create_dir_all(&config.upload.dir).await?;
    info!(dir = %config.upload.dir.display(), max_bytes = config.upload.max_bytes, "Upload staging ready");

    let app = api::create_router(stores, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
