use std::{env, error::Error, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;

use crate::{
    middleware_layer::request_id::request_id,
    routes::{
        ask_report_route::ask_report, explain_term_route::explain_term, health_route::health,
    },
};

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:5000";

/// Builds the router with all routes and layers.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/explain-term", post(explain_term))
        .route("/api/ask-report", post(ask_report))
        .with_state(state)
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C; if the handler cannot be installed, the server runs until killed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
