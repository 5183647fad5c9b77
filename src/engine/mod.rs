//! Frame engine
//!
//! [`Scene`] owns all mutable animation state and advances it one tick at a
//! time; [`run_loop`] drives it from a [`FrameTicker`].

pub mod runner;
pub mod scene;

pub use runner::{run_loop, FixedTicker, FrameTicker, IntervalTicker, LoopInputs};
pub use scene::{Scene, SceneSnapshot, TickReport};

use glam::Vec2;

use crate::gallery::ResolvedPhoto;
use crate::gesture::HandLandmarks;

/// Input applied at the start of a tick, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Summon or release
    Toggle,
    /// Pointer click in normalized device coordinates
    Pick(Vec2),
    /// Close the focused photo
    CloseFocus,
    ToggleMute,
    /// First hand tracker packet arrived
    TrackerReady,
    /// Hand tracker startup failed; continue without gestures
    TrackerFailed(String),
    PhotoResolved(ResolvedPhoto),
    Quit,
}

impl Command {
    /// Parse one console line: `t`, `p <x> <y>`, `c`, `m` or `q`
    pub fn from_console(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "t" | "toggle" => Self::Toggle,
            "p" | "pick" => {
                let x: f32 = words.next()?.parse().ok()?;
                let y: f32 = words.next()?.parse().ok()?;
                Self::Pick(Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE))
            }
            "c" | "close" => Self::CloseFocus,
            "m" | "mute" => Self::ToggleMute,
            "q" | "quit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Hand detection result for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Detection {
    /// No new detection frame since the last tick
    #[default]
    Unchanged,
    NoHand,
    Hand(HandLandmarks),
}

impl Detection {
    pub fn from_hand(hand: Option<HandLandmarks>) -> Self {
        match hand {
            Some(hand) => Self::Hand(hand),
            None => Self::NoHand,
        }
    }
}
