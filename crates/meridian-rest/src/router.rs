//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use meridian_config::ServerConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let api_router = Router::new()
        .nest("/users", user_controller::router())
        .with_state(state);

    let router = Router::new()
        // Health endpoint outside the API prefix
        .merge(health_controller::router())
        // API v1
        .nest("/api/v1", api_router)
        // Root endpoint
        .route("/", get(root))
        // Middleware layers
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http());

    info!("Router created with REST endpoints");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Meridian API v1"
}
