use std::net::SocketAddr;
use std::sync::Arc;

use sensor_gateway::{AppError, AppState, Config, Result, StoreStatus, create_router};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(AppError::Config(e));
    }

    tracing::info!(
        "Using InfluxDB at {} (org '{}', bucket '{}')",
        config.influx.url,
        config.influx.org,
        config.influx.bucket
    );

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let state = Arc::new(AppState::new(config)?);

    // Startup connectivity check; the service starts even if the store is down
    match sensor_gateway::probe_once(&state).await {
        StoreStatus::Connected => tracing::info!("InfluxDB connection established"),
        status => tracing::warn!(
            "InfluxDB is {} at startup, writes and queries will fail until it is reachable",
            status.as_str()
        ),
    }

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let probe_handle = sensor_gateway::start_probe_loop(shutdown_rx.clone(), state.clone());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Sensor gateway starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /api/ingest              - Store a sensor reading");
    tracing::info!("  - GET  /api/latest/{{sensor_id}}  - Latest reading");
    tracing::info!("  - GET  /api/history/{{sensor_id}} - History window (?minutes=N)");
    tracing::info!("  - GET  /health                  - Health check");
    tracing::info!("  - GET  /metrics                 - Prometheus metrics");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    let _ = probe_handle.await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn setup_tracing() {
    // RUST_LOG controls the filter; "info" when unset
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
