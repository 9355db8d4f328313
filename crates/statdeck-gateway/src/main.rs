//! statdeck gateway
//!
//! - HTTP API: register series, count events, render charts
//! - Housekeeping task sweeping buckets past the retention horizon
//! - Config from `STATDECK_CONFIG` (default `statdeck.yaml`)

use std::net::SocketAddr;

use statdeck_core::error::{Result, StatError};
use tracing_subscriber::{fmt, EnvFilter};

use statdeck_gateway::{app_state, config, housekeeping, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error=%e, "statdeck-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("STATDECK_CONFIG").unwrap_or_else(|_| "statdeck.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse().map_err(|e| {
        StatError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = app_state::AppState::new(cfg)?;
    let sweeper = housekeeping::spawn(state.clone());
    let app = router::build_router(state);

    tracing::info!(%listen, "statdeck-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| StatError::Internal(format!("failed to bind: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StatError::Internal(format!("server failed: {e}")))?;

    sweeper.abort();
    tracing::info!("statdeck-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error=%e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
