//! Precipitation Radial HTTP Server
//!
//! Main entry point for the sensor API server.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use infrastructure::{AppConfig, config::CONFIG_PATH_ENV, init_tracing};
use presentation_http::{
    IntegrationHost, ReloadableConfig, build_service, routes, spawn_config_reload_handler,
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    let config = AppConfig::load_from(config_path.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.telemetry)?;

    info!("Precipitation Radial v{} starting", env!("CARGO_PKG_VERSION"));

    let host = Arc::new(IntegrationHost::new());
    let entry = config.config_entry()?;
    let service = build_service(&config)?;
    host.install(&service, &entry)
        .await
        .context("integration setup failed")?;

    let reloadable = spawn_config_reload_handler(
        ReloadableConfig::new(config.clone(), config_path),
        Arc::clone(&host),
    );

    let app = routes::create_router(AppState::new(Arc::clone(&host)));
    let app = routes::with_static_files(app, &config.card.www_dir)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Server listening");
    info!("SIGHUP reloads the configuration (Unix only)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let timeout = Duration::from_secs(reloadable.load().server.shutdown_timeout_secs);
    if tokio::time::timeout(timeout, host.shutdown()).await.is_err() {
        warn!(?timeout, "Coordinators did not stop in time");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
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
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
