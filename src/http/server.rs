//! HTTP server for the country API

use super::handler::{
    country_handler, facts_handler, fallback_handler, knowledge_handler, list_countries_handler,
    search_handler, status_handler, summary_handler,
};
use super::AppState;
use crate::config::ServerConfig;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Routes of the request boundary
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/search", get(search_handler))
        .route("/countries", get(list_countries_handler))
        .route("/countries/:code", get(country_handler))
        .route("/countries/:code/facts", get(facts_handler))
        .route("/countries/:code/knowledge", get(knowledge_handler))
        .route("/summary", post(summary_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server exposing the aggregation layer
pub struct HttpServer {
    state: AppState,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Serve until Ctrl+C
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.config.bind_address()).await?;

        info!("Country API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Country API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
