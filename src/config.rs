//! Configuration parsing and management for steedfield

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, SteedfieldError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub particles: ParticleConfig,
    pub silhouette: SilhouetteConfig,
    pub gallery: GalleryConfig,
    pub gesture: GestureConfig,
    pub effects: EffectsConfig,
    pub animation: AnimationConfig,
    pub tracking: TrackingConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SteedfieldError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, SteedfieldError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, SteedfieldError> {
        let paths = [
            PathBuf::from("steedfield.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Particle count: explicit override, else the device tier default
    pub fn particle_count(&self) -> usize {
        self.particles
            .count
            .unwrap_or_else(|| self.device.tier.default_particle_count())
    }

    /// Baseline bloom strength: explicit override, else the device tier default
    pub fn bloom_strength(&self) -> f32 {
        self.effects
            .bloom_strength
            .unwrap_or_else(|| self.device.tier.default_bloom_strength())
    }

    /// Silhouette sampling step: explicit override, else the device tier default
    pub fn silhouette_step(&self) -> usize {
        self.silhouette
            .step
            .unwrap_or_else(|| self.device.tier.default_silhouette_step())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SteedfieldError> {
        if self.particle_count() == 0 {
            return Err(invalid("particles.count", "Particle count must be greater than 0"));
        }

        if self.particles.scatter_extent <= 0.0 {
            return Err(invalid(
                "particles.scatter_extent",
                "Scatter extent must be greater than 0",
            ));
        }

        if self.silhouette.scale <= 0.0 {
            return Err(invalid("silhouette.scale", "Scale must be greater than 0"));
        }

        if self.silhouette_step() == 0 {
            return Err(invalid("silhouette.step", "Step must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.silhouette.aura_probability) {
            return Err(invalid(
                "silhouette.aura_probability",
                "Probability must be between 0.0 and 1.0",
            ));
        }

        if self.gesture.fist_threshold <= 0.0
            || self.gesture.fist_threshold >= self.gesture.palm_threshold
        {
            return Err(invalid(
                "gesture.fist_threshold",
                "Fist threshold must be positive and below the palm threshold",
            ));
        }

        if self.gallery.radius <= 0.0 {
            return Err(invalid("gallery.radius", "Radius must be greater than 0"));
        }

        if self.animation.fps == 0 {
            return Err(invalid("animation.fps", "FPS must be greater than 0"));
        }

        if self.animation.time_step <= 0.0 {
            return Err(invalid(
                "animation.time_step",
                "Time step must be greater than 0",
            ));
        }

        if self.tracking.enabled && self.tracking.auto_launch {
            let path = Path::new(&self.tracking.tracker_script);
            if !path.exists() {
                tracing::warn!(
                    "Hand tracker auto_launch enabled but script not found at: {}",
                    self.tracking.tracker_script
                );
            }
        }

        if self.http.enabled && self.http.port == 0 {
            return Err(invalid("http.port", "Port must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> SteedfieldError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Hardware class, selecting lighter defaults on constrained devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Desktop,
    Constrained,
}

impl Default for DeviceTier {
    fn default() -> Self {
        Self::Desktop
    }
}

impl DeviceTier {
    pub fn default_particle_count(&self) -> usize {
        match self {
            Self::Desktop => 15_000,
            Self::Constrained => 6_000,
        }
    }

    pub fn default_bloom_strength(&self) -> f32 {
        match self {
            Self::Desktop => 2.2,
            Self::Constrained => 1.5,
        }
    }

    pub fn default_silhouette_step(&self) -> usize {
        match self {
            Self::Desktop => 2,
            Self::Constrained => 3,
        }
    }
}

impl FromStr for DeviceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "constrained" | "mobile" => Ok(Self::Constrained),
            other => Err(format!("unknown device tier '{}'", other)),
        }
    }
}

/// Device configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub tier: DeviceTier,
}

/// Particle field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particle count (defaults by device tier)
    pub count: Option<usize>,
    /// Seed for scatter origins and silhouette sampling
    pub seed: u32,
    /// Edge length of the scatter cube
    pub scatter_extent: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: None,
            seed: 0x5EED_0001,
            scatter_extent: 150.0,
        }
    }
}

/// Silhouette point source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SilhouetteConfig {
    /// Point file (.json) or text mask; the built-in steed when unset
    pub source: Option<PathBuf>,
    /// World units per mask pixel
    pub scale: f32,
    /// Sampling step in mask pixels (defaults by device tier)
    pub step: Option<usize>,
    /// Mask pixels per text character
    pub cell_size: usize,
    /// Total z spread of body points
    pub depth: f32,
    /// Chance an ink sample also seeds an aura point
    pub aura_probability: f32,
    /// Total per-axis spread of the one-time body jitter
    pub jitter: f32,
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self {
            source: None,
            scale: 0.14,
            step: None,
            cell_size: 8,
            depth: 6.0,
            aura_probability: 0.1,
            jitter: 0.2,
        }
    }
}

/// Photo gallery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Number of gallery slots on the sphere
    pub photo_count: u32,
    /// Sphere radius
    pub radius: f32,
    /// Directory of photo files; placeholders when unset
    pub photo_dir: Option<PathBuf>,
    /// Distance in front of the camera for a focused photo
    pub focus_distance: f32,
    /// Scale of a focused photo
    pub focus_scale: f32,
    /// Photo quad width
    pub photo_width: f32,
    /// Photo quad height
    pub photo_height: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            photo_count: 30,
            radius: 25.0,
            photo_dir: None,
            focus_distance: 15.0,
            focus_scale: 3.5,
            photo_width: 3.3,
            photo_height: 5.0,
        }
    }
}

/// Gesture classification thresholds (normalized landmark units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Average fingertip-to-wrist distance below which the hand is a fist
    pub fist_threshold: f32,
    /// Average distance above which the hand is an open palm
    pub palm_threshold: f32,
    /// A fist is confirmed once held for more than this many frames
    pub fist_hold_frames: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            fist_threshold: 0.28,
            palm_threshold: 0.40,
            fist_hold_frames: 15,
        }
    }
}

/// Post-processing parameter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Baseline bloom strength (defaults by device tier)
    pub bloom_strength: Option<f32>,
    /// Bloom strength while a photo is focused
    pub bloom_focused: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    /// Overlay opacity while a photo is focused
    pub dimmer_opacity: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            bloom_strength: None,
            bloom_focused: 0.1,
            bloom_radius: 0.6,
            bloom_threshold: 0.0,
            dimmer_opacity: 0.8,
        }
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Target frames per second
    pub fps: u32,
    /// Animation time added per frame
    pub time_step: f32,
    /// Delay between the explosion and the gallery
    pub explode_delay_ms: u64,
    /// Mean particle distance below which the morph counts as settled
    pub settle_distance: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            time_step: 0.01,
            explode_delay_ms: 1500,
            settle_distance: 0.5,
        }
    }
}

/// Hand tracker configuration (JSON landmarks over UDP)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Enable gesture input
    pub enabled: bool,
    /// Listen address for UDP socket
    pub listen_address: String,
    /// UDP port to receive landmark packets on
    pub port: u16,
    /// Auto-launch the tracker helper subprocess
    pub auto_launch: bool,
    /// Path to the tracker helper script
    pub tracker_script: String,
    /// Camera device index
    pub camera_device: u32,
    /// Camera capture width
    pub capture_width: u32,
    /// Camera capture height
    pub capture_height: u32,
    /// How long to wait for the first landmark packet
    pub startup_timeout_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_address: "127.0.0.1".to_string(),
            port: 12347,
            auto_launch: false,
            tracker_script: "scripts/hand_tracker.py".to_string(),
            camera_device: 0,
            capture_width: 320,
            capture_height: 240,
            startup_timeout_secs: 10,
        }
    }
}

/// HTTP status server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable HTTP server
    pub enabled: bool,
    /// HTTP server host
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Allow cross-origin requests
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_enabled: true,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("steedfield");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/steedfield");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/steedfield");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("steedfield");
        }
    }

    PathBuf::from(".")
}
