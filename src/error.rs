//! Error types for steedfield

use thiserror::Error;

/// Main error type for steedfield
#[derive(Error, Debug)]
pub enum SteedfieldError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Silhouette error: {0}")]
    Silhouette(#[from] SilhouetteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Hand tracker errors. Any of these during startup means the tracker is
/// unavailable and the scene runs in manual-only mode.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Hand tracker receiver error: {0}")]
    Receiver(String),

    #[error("Hand tracker parse error: {0}")]
    Parse(String),

    #[error("Hand tracker subprocess error: {0}")]
    Subprocess(String),

    #[error("No hand tracker data within {0}s")]
    StartupTimeout(u64),
}

/// Gallery photo resolution errors. Each affects only its own photo slot.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Photo directory not readable: {0}")]
    Directory(String),

    #[error("Photo not found for slot {0}")]
    Missing(u32),

    #[error("Photo unreadable: {path} - {message}")]
    Unreadable { path: String, message: String },
}

/// Silhouette point source errors
#[derive(Error, Debug)]
pub enum SilhouetteError {
    #[error("Failed to read silhouette source: {0}")]
    ReadFile(String),

    #[error("Failed to parse silhouette points: {0}")]
    Parse(String),
}

/// Result type alias for steedfield operations
pub type Result<T> = std::result::Result<T, SteedfieldError>;
