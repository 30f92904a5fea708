//! Application builder: wires router, middleware, and state into an Axum
//! app, and runs it until shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use docspace_auth::session::SessionCleanup;
use docspace_core::config::AppConfig;
use docspace_core::error::{AppError, ErrorKind};
use docspace_database::Repositories;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the DocSpace server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig, repositories: Repositories) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let cleanup = config.session.cleanup.clone();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, repositories)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = if cleanup.enabled {
        let interval = Duration::from_secs(cleanup.interval_minutes.max(1) * 60);
        Some(SessionCleanup::new(Arc::clone(&state.sessions)).spawn(interval, shutdown_rx))
    } else {
        tracing::info!("Expired-session sweeper disabled");
        None
    };

    let repositories = state.repositories.clone();
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    tracing::info!(address = %addr, "DocSpace server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    if let Some(handle) = sweeper {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Session sweeper did not stop within the grace period");
        }
    }

    if let Some(pool) = &repositories.pool {
        pool.close().await;
    }

    tracing::info!("DocSpace server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
