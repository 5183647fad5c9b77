//! Output module
//!
//! Hands each finished frame to the rendering collaborator and publishes
//! status to HTTP subscribers:
//! - [`FrameSink`] receives particle buffers, photo transforms and effect
//!   parameters once per tick
//! - Server-Sent Events stream of status updates

pub mod headless;
pub mod sse;

pub use headless::HeadlessSink;

use steedfield_fx::effect::EffectParams;

use crate::gallery::{CameraView, Photo};
use crate::state::AppState;

/// Everything the renderer needs for one frame, borrowed from the scene
#[derive(Debug)]
pub struct FrameOutput<'a> {
    pub frame: u64,
    pub state: AppState,
    /// `count * 3` floats, x y z per particle
    pub positions: &'a [f32],
    /// Positions changed since the last upload
    pub positions_dirty: bool,
    pub photos: &'a [Photo],
    pub gallery_visible: bool,
    /// Enabled post-processing effects, in chain order
    pub effects: Vec<(&'a str, EffectParams)>,
    pub camera: &'a CameraView,
    pub auto_rotate: bool,
}

impl FrameOutput<'_> {
    pub fn particle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Parameters of the named effect, if enabled
    pub fn effect(&self, name: &str) -> Option<EffectParams> {
        self.effects
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, params)| *params)
    }
}

/// Rendering collaborator
pub trait FrameSink: Send {
    fn present(&mut self, frame: &FrameOutput<'_>);
}
