use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use execsummary_api::{build_router, shutdown_signal, AppState};
use execsummary_common::Config;
use execsummary_store::{PgEventStore, PoolSettings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::web_from_env().context("Invalid configuration")?;

    let store = PgEventStore::connect(
        &config.database_url,
        PoolSettings {
            max_connections: config.db_max_connections,
            acquire_timeout: config.db_acquire_timeout,
        },
    )
    .await?;

    let state = Arc::new(AppState {
        reader: Arc::new(store.clone()),
        properties: config.properties.clone(),
        rules: config.signal_rules.clone(),
    });
    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Exec summary API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}
