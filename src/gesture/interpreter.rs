//! Fist/palm classification with hold-frame debouncing

use super::landmarks::HandLandmarks;
use crate::config::GestureConfig;
use crate::state::{AppState, Trigger};

/// Debounced gesture event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSignal {
    FistConfirmed,
    PalmConfirmed,
}

impl GestureSignal {
    pub fn trigger(&self) -> Trigger {
        match self {
            Self::FistConfirmed => Trigger::FistConfirmed,
            Self::PalmConfirmed => Trigger::PalmConfirmed,
        }
    }
}

/// Raw per-frame pose class before debouncing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPose {
    Fist,
    Open,
    /// Between the two thresholds
    Neutral,
}

/// Turns per-frame landmarks into one-shot gesture signals.
///
/// A fist must be held for more than `fist_hold_frames` consecutive frames.
/// An open palm fires on the first qualifying frame. Anything that is not a
/// fist (no hand, the dead zone, an open palm) resets the hold counter.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    fist_threshold: f32,
    palm_threshold: f32,
    fist_hold_frames: u32,
    fist_frames: u32,
    fist_fired: bool,
    last_distance: Option<f32>,
}

impl GestureInterpreter {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            fist_threshold: config.fist_threshold,
            palm_threshold: config.palm_threshold,
            fist_hold_frames: config.fist_hold_frames,
            fist_frames: 0,
            fist_fired: false,
            last_distance: None,
        }
    }

    pub fn classify(&self, distance: f32) -> HandPose {
        if distance < self.fist_threshold {
            HandPose::Fist
        } else if distance > self.palm_threshold {
            HandPose::Open
        } else {
            HandPose::Neutral
        }
    }

    /// Interpret one detection frame against the current application state
    pub fn observe(&mut self, hand: Option<&HandLandmarks>, state: AppState) -> Option<GestureSignal> {
        let Some(hand) = hand else {
            self.reset();
            self.last_distance = None;
            return None;
        };

        let distance = hand.average_tip_distance();
        self.last_distance = Some(distance);

        match self.classify(distance) {
            HandPose::Fist => {
                self.fist_frames = self.fist_frames.saturating_add(1);
                if self.fist_frames > self.fist_hold_frames
                    && !self.fist_fired
                    && !state.is_summoned()
                {
                    self.fist_fired = true;
                    tracing::debug!("Fist confirmed after {} frames", self.fist_frames);
                    return Some(GestureSignal::FistConfirmed);
                }
                None
            }
            HandPose::Open => {
                self.reset();
                state.is_summoned().then_some(GestureSignal::PalmConfirmed)
            }
            HandPose::Neutral => {
                self.reset();
                None
            }
        }
    }

    /// Consecutive fist frames seen so far
    pub fn fist_frames(&self) -> u32 {
        self.fist_frames
    }

    /// Average fingertip distance of the last detected hand
    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    fn reset(&mut self) {
        self.fist_frames = 0;
        self.fist_fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::fixtures::hand_with_spread;

    fn hand(distance: f32) -> HandLandmarks {
        HandLandmarks::from_points(&hand_with_spread(distance)).unwrap()
    }

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(&GestureConfig::default())
    }

    #[test]
    fn test_fist_needs_sixteen_frames() {
        let mut g = interpreter();
        let fist = hand(0.20);
        for frame in 1..=15 {
            assert_eq!(g.observe(Some(&fist), AppState::Scattered), None, "frame {}", frame);
        }
        assert_eq!(
            g.observe(Some(&fist), AppState::Scattered),
            Some(GestureSignal::FistConfirmed)
        );
    }

    #[test]
    fn test_fist_fires_once_per_hold() {
        let mut g = interpreter();
        let fist = hand(0.20);
        let fired = (0..40)
            .filter_map(|_| g.observe(Some(&fist), AppState::Gallery))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_fist_suppressed_while_summoned() {
        for state in [AppState::Forming, AppState::Formed] {
            let mut g = interpreter();
            let fist = hand(0.1);
            for _ in 0..30 {
                assert_eq!(g.observe(Some(&fist), state), None);
            }
            assert_eq!(g.fist_frames(), 30);
        }
    }

    #[test]
    fn test_dead_zone_resets_counter() {
        let mut g = interpreter();
        let fist = hand(0.20);
        for _ in 0..15 {
            g.observe(Some(&fist), AppState::Scattered);
        }
        assert_eq!(g.fist_frames(), 15);

        for distance in [0.29, 0.34, 0.39] {
            for _ in 0..15 {
                g.observe(Some(&fist), AppState::Scattered);
            }
            assert_eq!(g.observe(Some(&hand(distance)), AppState::Scattered), None);
            assert_eq!(g.fist_frames(), 0);
        }
    }

    #[test]
    fn test_no_hand_resets_counter() {
        let mut g = interpreter();
        let fist = hand(0.20);
        for _ in 0..15 {
            g.observe(Some(&fist), AppState::Scattered);
        }
        assert_eq!(g.observe(None, AppState::Scattered), None);
        assert_eq!(g.fist_frames(), 0);
        assert_eq!(g.last_distance(), None);

        // a full hold is needed again
        for _ in 0..15 {
            assert_eq!(g.observe(Some(&fist), AppState::Scattered), None);
        }
        assert!(g.observe(Some(&fist), AppState::Scattered).is_some());
    }

    #[test]
    fn test_palm_only_when_summoned() {
        let open = hand(0.55);
        for state in AppState::ALL {
            let mut g = interpreter();
            let signal = g.observe(Some(&open), state);
            if state.is_summoned() {
                assert_eq!(signal, Some(GestureSignal::PalmConfirmed));
            } else {
                assert_eq!(signal, None);
            }
        }
    }

    #[test]
    fn test_palm_needs_strictly_above_threshold() {
        let g = interpreter();
        assert_eq!(g.classify(0.40), HandPose::Neutral);
        assert_eq!(g.classify(0.4001), HandPose::Open);
        assert_eq!(g.classify(0.28), HandPose::Neutral);
        assert_eq!(g.classify(0.2799), HandPose::Fist);
    }

    #[test]
    fn test_signal_maps_to_trigger() {
        assert_eq!(GestureSignal::FistConfirmed.trigger(), Trigger::FistConfirmed);
        assert_eq!(GestureSignal::PalmConfirmed.trigger(), Trigger::PalmConfirmed);
    }
}
