use crate::effect::{EffectParams, PostEffect};
use crate::ease;

/// Bloom strength is the scene's "effect intensity": it eases toward a
/// baseline normally and drops to a low value while a photo is focused.
pub struct Bloom {
    pub strength: f32,
    pub baseline: f32,
    pub focused_strength: f32,
    pub radius: f32,
    pub threshold: f32,
    /// Fraction of the remaining distance covered per frame
    pub ease: f32,
    target: f32,
    pub enabled: bool,
}

impl Bloom {
    pub fn new(baseline: f32) -> Self {
        Self {
            strength: baseline,
            baseline,
            focused_strength: 0.1,
            radius: 0.6,
            threshold: 0.0,
            ease: 0.05,
            target: baseline,
            enabled: true,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

impl PostEffect for Bloom {
    fn step(&mut self) {
        self.strength = ease(self.strength, self.target, self.ease);
    }

    fn set_focused(&mut self, focused: bool) {
        self.target = if focused {
            self.focused_strength
        } else {
            self.baseline
        };
    }

    fn params(&self) -> EffectParams {
        EffectParams {
            params: [self.strength, self.radius, self.threshold, 0.0],
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Bloom"
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
    fn test_focus_retargets() {
        let mut bloom = Bloom::new(2.2);
        bloom.set_focused(true);
        assert_eq!(bloom.target(), 0.1);
        bloom.step();
        // 5% of the way from 2.2 to 0.1
        assert!((bloom.strength - (2.2 - 2.1 * 0.05)).abs() < 1e-5);

        bloom.set_focused(false);
        assert_eq!(bloom.target(), 2.2);
    }

    #[test]
    fn test_converges() {
        let mut bloom = Bloom::new(1.5);
        bloom.set_focused(true);
        for _ in 0..400 {
            bloom.step();
        }
        assert!((bloom.strength - 0.1).abs() < 1e-3);
        assert_eq!(bloom.params().params[0], bloom.strength);
    }
}
