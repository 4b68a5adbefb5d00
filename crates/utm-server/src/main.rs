//! UTM Server - always-on backend for drone traffic management.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use utm_server::api;
use utm_server::config::Config;
use utm_server::loops;
use utm_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("utm_server=debug".parse()?);
    let config = Config::from_env();
    if config.log_format.trim().eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Starting UTM Server...");

    let state = Arc::new(AppState::new(config.core.clone()));

    let (shutdown_tx, _) = broadcast::channel(1);

    {
        let state = state.clone();
        let interval = config.queue_drain_interval_secs;
        let shutdown = shutdown_tx.subscribe();
        tokio::spawn(async move {
            loops::queue_drain_loop::run_queue_drain_loop(state, interval, shutdown).await;
        });
    }
    {
        let state = state.clone();
        let interval = config.conflict_scan_interval_secs;
        let shutdown = shutdown_tx.subscribe();
        tokio::spawn(async move {
            loops::conflict_loop::run_conflict_loop(state, interval, shutdown).await;
        });
    }

    tracing::info!("CORS origins: {:?}", config.allowed_origins);

    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .layer(axum::middleware::from_fn(api::request_id::ensure_request_id))
        .with_state(state);

    let app = if config.allowed_origins.is_empty() {
        tracing::warn!("No CORS origins configured - CORS disabled (same-origin only)");
        app
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers(Any),
        )
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = sigterm.recv() => {},
            }
        }
        Err(err) => {
            tracing::warn!("Failed to install SIGTERM handler (CTRL-C only): {}", err);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[cfg(not(unix))]
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
