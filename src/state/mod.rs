//! Application state machine
//!
//! Five phases, driven by confirmed gestures or the manual toggle:
//! `scattered -> forming -> formed -> exploding -> gallery`, with a fist
//! returning to `forming` from either exploding phase.

mod machine;
mod timer;

pub use machine::{SideEffect, StateMachine, Trigger};
pub use timer::{PendingTransition, TransitionTimer};

use serde::{Deserialize, Serialize};

use crate::status::StatusLabel;

/// Current interaction phase. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    /// Particles drift around their scatter origins
    Scattered,
    /// Particles converging into the silhouette
    Forming,
    /// Silhouette has settled
    Formed,
    /// Silhouette bursting outward, gallery fading in
    Exploding,
    /// Photos on display
    Gallery,
}

impl Default for AppState {
    fn default() -> Self {
        Self::Scattered
    }
}

impl AppState {
    pub const ALL: [AppState; 5] = [
        AppState::Scattered,
        AppState::Forming,
        AppState::Formed,
        AppState::Exploding,
        AppState::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scattered => "scattered",
            Self::Forming => "forming",
            Self::Formed => "formed",
            Self::Exploding => "exploding",
            Self::Gallery => "gallery",
        }
    }

    /// Forming and formed share dynamics and differ only in gating
    pub fn is_summoned(&self) -> bool {
        matches!(self, Self::Forming | Self::Formed)
    }

    /// Photos are visible in these phases
    pub fn shows_gallery(&self) -> bool {
        matches!(self, Self::Exploding | Self::Gallery)
    }

    /// Label shown on entering this phase
    pub fn status_label(&self) -> StatusLabel {
        match self {
            Self::Scattered => StatusLabel::Scattered,
            Self::Forming | Self::Formed => StatusLabel::Fist,
            Self::Exploding => StatusLabel::Palm,
            Self::Gallery => StatusLabel::Viewing,
        }
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_scattered() {
        assert_eq!(AppState::default(), AppState::Scattered);
    }

    #[test]
    fn test_phase_groups_are_disjoint() {
        for state in AppState::ALL {
            assert!(!(state.is_summoned() && state.shows_gallery()));
        }
        assert!(AppState::Forming.is_summoned());
        assert!(AppState::Formed.is_summoned());
        assert!(AppState::Gallery.shows_gallery());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AppState::Exploding).unwrap();
        assert_eq!(json, "\"exploding\"");
        assert_eq!(AppState::Formed.to_string(), "formed");
    }
}
