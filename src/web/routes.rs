//! Route definitions for the status server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::ServiceHub;

use super::api;

/// Create the main router with all routes
pub fn create_router(hub: Arc<ServiceHub>, config: &HttpConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Status for the UI collaborator
        .route("/events", get(api::status_stream))
        .route("/state", get(api::get_state))
        // API endpoints (JSON)
        .route("/api/status", get(api::get_status))
        .route("/api/config", get(api::get_config))
        .route("/api/state", get(api::get_state))
        .route("/api/stream", get(api::status_stream))
        // Manual control surface
        .route("/api/toggle", post(api::toggle))
        .route("/api/pick", post(api::pick))
        .route("/api/close", post(api::close_focus))
        .route("/api/mute", post(api::toggle_mute))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(hub)
}
