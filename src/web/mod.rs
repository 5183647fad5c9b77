//! HTTP status server
//!
//! JSON snapshot, status event stream and the manual control endpoints.

pub mod api;
pub mod routes;

use axum::Router;
use std::sync::Arc;

use crate::config::HttpConfig;
use crate::ServiceHub;

/// Web server for status and control
pub struct WebServer {
    hub: Arc<ServiceHub>,
    config: HttpConfig,
}

impl WebServer {
    /// Create a new web server
    pub fn new(hub: Arc<ServiceHub>, config: &HttpConfig) -> Self {
        Self {
            hub,
            config: config.clone(),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        routes::create_router(Arc::clone(&self.hub), &self.config)
    }
}
