pub mod effect;
pub mod effects;
pub mod particles;

use effect::{EffectParams, PostEffect};

/// Move `current` the fraction `factor` of the way toward `target`.
pub fn ease(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Ordered set of post-processing effects stepped together once per frame.
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn PostEffect>>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    pub fn push(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Advance every effect by one frame, enabled or not, so re-enabling
    /// an effect does not jump.
    pub fn step(&mut self) {
        for effect in &mut self.effects {
            effect.step();
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        for effect in &mut self.effects {
            effect.set_focused(focused);
        }
    }

    /// Parameters of enabled effects, in chain order.
    pub fn params(&self) -> Vec<(&str, EffectParams)> {
        self.effects
            .iter()
            .filter(|e| e.enabled())
            .map(|e| (e.name(), e.params()))
            .collect()
    }

    pub fn has_enabled_effects(&self) -> bool {
        self.effects.iter().any(|e| e.enabled())
    }

    pub fn effects_mut(&mut self) -> &mut Vec<Box<dyn PostEffect>> {
        &mut self.effects
    }

    /// Typed access to the first effect of type `T`.
    pub fn find<T: PostEffect + 'static>(&self) -> Option<&T> {
        self.effects
            .iter()
            .find_map(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn find_mut<T: PostEffect + 'static>(&mut self) -> Option<&mut T> {
        self.effects
            .iter_mut()
            .find_map(|e| e.as_any_mut().downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effects::{Bloom, Dimmer};

    fn chain() -> EffectChain {
        let mut chain = EffectChain::new();
        chain.push(Box::new(Bloom::new(2.2)));
        chain.push(Box::new(Dimmer::new(0.8)));
        chain
    }

    #[test]
    fn test_ease() {
        assert_eq!(ease(0.0, 10.0, 0.1), 1.0);
        assert_eq!(ease(5.0, 5.0, 0.3), 5.0);
    }

    #[test]
    fn test_params_skip_disabled() {
        let mut chain = chain();
        assert_eq!(chain.params().len(), 2);

        chain.find_mut::<Dimmer>().unwrap().enabled = false;
        let params = chain.params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0, "Bloom");
        assert!(chain.has_enabled_effects());
    }

    #[test]
    fn test_focus_reaches_all_effects() {
        let mut chain = chain();
        chain.set_focused(true);
        chain.step();
        assert_eq!(chain.find::<Bloom>().unwrap().target(), 0.1);
        assert!(chain.find_mut::<Dimmer>().unwrap().opacity > 0.0);
    }
}
