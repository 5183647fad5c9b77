//! REST API endpoints

use axum::{extract::State, response::IntoResponse, Json};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::Command;
use crate::output::sse;
use crate::ServiceHub;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
    }

    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            error: None,
        })
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub state: String,
    pub status: String,
    pub manual: bool,
    pub tracker_connected: bool,
}

/// Get current status
pub async fn get_status(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    let snapshot = hub.get_snapshot().await;

    ApiResponse::success(StatusResponse {
        name: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        state: snapshot.state.to_string(),
        status: snapshot.status.to_string(),
        manual: snapshot.manual,
        tracker_connected: hub.is_tracker_connected(),
    })
}

/// Get current configuration
pub async fn get_config(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    let config = hub.config.read().await;
    Json(config.clone())
}

/// Latest scene snapshot
pub async fn get_state(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    Json(hub.get_snapshot().await)
}

/// Pointer position for a pick, in normalized device coordinates
#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub x: f32,
    pub y: f32,
}

pub async fn toggle(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    queue(&hub, Command::Toggle).await
}

pub async fn pick(
    State(hub): State<Arc<ServiceHub>>,
    Json(request): Json<PickRequest>,
) -> impl IntoResponse {
    if !(-1.0..=1.0).contains(&request.x) || !(-1.0..=1.0).contains(&request.y) {
        return ApiResponse::error("Pick coordinates must be within [-1, 1]");
    }
    queue(&hub, Command::Pick(Vec2::new(request.x, request.y))).await
}

pub async fn close_focus(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    queue(&hub, Command::CloseFocus).await
}

pub async fn toggle_mute(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    queue(&hub, Command::ToggleMute).await
}

/// SSE stream of status updates
pub async fn status_stream(State(hub): State<Arc<ServiceHub>>) -> impl IntoResponse {
    sse::create_status_stream(hub)
}

async fn queue(hub: &ServiceHub, command: Command) -> Json<ApiResponse<()>> {
    if hub.send_command(command).await {
        ApiResponse::ok()
    } else {
        ApiResponse::error("Scene is not running")
    }
}
