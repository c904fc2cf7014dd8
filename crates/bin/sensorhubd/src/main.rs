//! # sensorhubd: sensorhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`sensorhub.toml`, environment overrides)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repositories, services and the axum router
//! - Serve until SIGINT/SIGTERM, then drain requests and close the pool
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use sensorhub_adapter_http_axum::state::AppState;
use sensorhub_adapter_storage_sqlite_sqlx::{
    SqliteDeviceRepository, SqliteReadingRepository, SqliteReportRepository,
};
use sensorhub_app::services::device_service::DeviceService;
use sensorhub_app::services::reading_service::ReadingService;
use sensorhub_app::services::report_service::ReportService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = config.storage().build().await?;
    let pool = db.pool().clone();

    // Services; repositories are thin handles over the shared pool.
    let device_service = DeviceService::new(
        SqliteDeviceRepository::new(pool.clone()),
        SqliteReadingRepository::new(pool.clone()),
    );
    let reading_service = ReadingService::new(
        SqliteDeviceRepository::new(pool.clone()),
        SqliteReadingRepository::new(pool.clone()),
    );
    let report_service = ReportService::new(
        SqliteDeviceRepository::new(pool.clone()),
        SqliteReportRepository::new(pool),
    );

    // HTTP
    let state = AppState::new(device_service, reading_service, report_service);
    let app = sensorhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "sensorhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
