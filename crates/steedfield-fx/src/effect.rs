use std::any::Any;

use bytemuck::{Pod, Zeroable};

/// Uniform-ready parameter block handed to the post-processing collaborator.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct EffectParams {
    pub params: [f32; 4],
}

/// One post-processing effect whose parameters ease toward a target each frame.
///
/// The effect never renders anything itself; the renderer reads [`params`]
/// after every frame.
///
/// [`params`]: PostEffect::params
pub trait PostEffect: Send + Sync {
    /// Advance eased parameters by one frame.
    fn step(&mut self);

    /// Retarget for a focused (single item enlarged) or ambient view.
    fn set_focused(&mut self, focused: bool);

    /// Current parameter block.
    fn params(&self) -> EffectParams;

    /// Whether this effect is currently active.
    fn enabled(&self) -> bool;

    /// Human-readable name, also used as the renderer-side key.
    fn name(&self) -> &str;

    /// Downcast support for typed access from the application.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
