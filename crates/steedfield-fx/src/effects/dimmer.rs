use crate::effect::{EffectParams, PostEffect};
use crate::ease;

/// Full-screen darkening overlay shown behind a focused photo.
pub struct Dimmer {
    pub opacity: f32,
    pub max_opacity: f32,
    pub ease: f32,
    target: f32,
    pub enabled: bool,
}

impl Dimmer {
    pub fn new(max_opacity: f32) -> Self {
        Self {
            opacity: 0.0,
            max_opacity,
            ease: 0.1,
            target: 0.0,
            enabled: true,
        }
    }
}

impl PostEffect for Dimmer {
    fn step(&mut self) {
        self.opacity = ease(self.opacity, self.target, self.ease);
    }

    fn set_focused(&mut self, focused: bool) {
        self.target = if focused { self.max_opacity } else { 0.0 };
    }

    fn params(&self) -> EffectParams {
        EffectParams {
            params: [self.opacity, 0.0, 0.0, 0.0],
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Dimmer"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fades_in_and_out() {
        let mut dimmer = Dimmer::new(0.8);
        dimmer.set_focused(true);
        for _ in 0..200 {
            dimmer.step();
        }
        assert!((dimmer.opacity - 0.8).abs() < 1e-3);

        dimmer.set_focused(false);
        for _ in 0..200 {
            dimmer.step();
        }
        assert!(dimmer.opacity < 1e-3);
    }
}
