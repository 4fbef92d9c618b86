//! drainq - Main Entry Point
//! In-memory bounded queue store with HTTP and JSON-RPC front ends

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use drainq_api_rpc::{HttpServer, RpcServer};
use drainq_core::application::{
    shutdown_channel, CapacitySweeper, IdleSweeper, StatusReporter,
};
use drainq_core::QueueStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("drainq=info,drainq_core=info,drainq_api_rpc=info"))
        .context("Failed to create env filter")?;

    match config::log_format() {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("drainq v{} starting...", VERSION);

    // 2. Load configuration
    let config = DaemonConfig::from_env().context("Invalid configuration")?;
    info!(
        default_capacity = config.store.default_capacity,
        idle_threshold_secs = config.store.idle_threshold.as_secs(),
        idle_sweep_interval_secs = config.store.idle_sweep_interval.as_secs(),
        "Configuration loaded"
    );

    // 3. Build the shared store
    let store = Arc::new(QueueStore::with_monotonic_clock(config.store.clone())?);
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 4. Start background loops
    info!("Starting sweepers...");
    let mut background = vec![
        tokio::spawn(CapacitySweeper::new(store.clone()).run(shutdown_rx.clone())),
        tokio::spawn(IdleSweeper::new(store.clone()).run(shutdown_rx.clone())),
    ];

    if let Some(interval) = config.status_interval {
        let reporter = StatusReporter::new(store.clone(), interval);
        background.push(tokio::spawn(reporter.run(shutdown_rx.clone())));
    }

    // 5. Start front ends
    let (rpc_addr, rpc_handle) = RpcServer::new(config.rpc, store.clone())
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    let (http_addr, http_task) = HttpServer::new(config.http, store.clone())
        .start(shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server start failed: {}", e))?;
    background.push(http_task);

    info!(http = %http_addr, rpc = %rpc_addr, "System ready. Accepting items...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, join_background(background)).await;

    info!("Shutdown complete.");

    Ok(())
}

/// Await every background task, logging abnormal exits
async fn join_background(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = ?e, "Background task ended abnormally");
        }
    }
}
