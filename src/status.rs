//! Status labels for the UI collaborator

use serde::{Deserialize, Serialize};

/// Notice shown once the scene falls back to manual-only control
pub const MANUAL_FALLBACK_NOTICE: &str = "Vision model failed. Using manual mode.";

/// Label/icon pair the UI displays for the current interaction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    /// Waiting for a fist
    Scattered,
    /// Silhouette summoned
    Fist,
    /// Released into the gallery
    Palm,
    /// Browsing or inspecting photos
    Viewing,
}

impl Default for StatusLabel {
    fn default() -> Self {
        Self::Scattered
    }
}

impl StatusLabel {
    /// Stable key used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scattered => "scattered",
            Self::Fist => "fist",
            Self::Palm => "palm",
            Self::Viewing => "viewing",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Scattered => "Make a fist to summon the steed",
            Self::Fist => "Steed summoned. Open your palm to release",
            Self::Palm => "Released. Make a fist to summon again",
            Self::Viewing => "Viewing memories",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Scattered => "✊",
            Self::Fist => "🐎",
            Self::Palm => "🖐",
            Self::Viewing => "🖼",
        }
    }

    /// Whether the UI should highlight the label
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Scattered)
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A status change broadcast to UI subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub label: StatusLabel,
    pub text: String,
    pub icon: String,
    pub active: bool,
    /// Application state name at the time of the update
    pub state: String,
    /// Set once the scene runs without hand tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl StatusUpdate {
    pub fn new(label: StatusLabel, state: impl Into<String>) -> Self {
        Self {
            label,
            text: label.text().to_string(),
            icon: label.icon().to_string(),
            active: label.is_active(),
            state: state.into(),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
