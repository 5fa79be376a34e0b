use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::{json_error_mapper, request_id},
    routes::{
        chat::chat_route::chat_route, finance::finance_route::finance_route,
        health_route::health_route,
    },
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";

/// Request bodies carry base64 attachments; axum's 2 MB default is too small.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Build the application router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = env::var("API_BODY_LIMIT_BYTES")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_BODY_LIMIT_BYTES);

    Router::new()
        .route("/api/chat", post(chat_route))
        .route("/api/finance", post(finance_route))
        .route("/health", get(health_route))
        .fallback(|| async { AppError::NotFound })
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Load state from the environment and serve until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(|source| AppError::Bind {
            addr: host_url.clone(),
            source,
        })?;

    info!(address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
