//! Transition rules and entry side effects

use std::time::Duration;
use tracing::{debug, info};

use super::timer::TransitionTimer;
use super::AppState;
use crate::audio::ToneCue;
use crate::status::StatusLabel;

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A debounced fist from the gesture interpreter
    FistConfirmed,
    /// An open palm from the gesture interpreter
    PalmConfirmed,
    /// Summon or release, whichever the current phase calls for
    ManualToggle,
    /// The particle field reached the silhouette
    Settled,
}

/// Work the scene performs on entering a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    Cue(ToneCue),
    Status(StatusLabel),
    /// Force any focused photo back into the gallery
    ClearFocus,
}

/// Owns the current [`AppState`] and the delayed gallery transition.
#[derive(Debug)]
pub struct StateMachine {
    state: AppState,
    timer: TransitionTimer,
    explode_delay: Duration,
    manual_mode: bool,
    transitions: u64,
}

impl StateMachine {
    pub fn new(explode_delay: Duration) -> Self {
        Self {
            state: AppState::Scattered,
            timer: TransitionTimer::new(),
            explode_delay,
            manual_mode: false,
            transitions: 0,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn timer(&self) -> &TransitionTimer {
        &self.timer
    }

    pub fn is_manual(&self) -> bool {
        self.manual_mode
    }

    /// Ignore gesture triggers from now on. There is no way back.
    pub fn enable_manual_mode(&mut self) {
        if !self.manual_mode {
            info!("Manual mode enabled, gesture input ignored");
            self.manual_mode = true;
        }
    }

    /// Number of state changes since creation
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Feed one trigger at scene time `now`. Returns the entry side effects
    /// in the order they must be applied.
    pub fn apply(&mut self, trigger: Trigger, now: Duration) -> Vec<SideEffect> {
        match trigger {
            Trigger::FistConfirmed | Trigger::PalmConfirmed if self.manual_mode => {
                debug!("Ignoring {:?} in manual mode", trigger);
                Vec::new()
            }
            Trigger::FistConfirmed => self.summon(),
            Trigger::PalmConfirmed => self.release(now),
            Trigger::ManualToggle => {
                if self.state.is_summoned() {
                    self.release(now)
                } else {
                    self.summon()
                }
            }
            Trigger::Settled => {
                if self.state == AppState::Forming {
                    self.enter(AppState::Formed);
                }
                Vec::new()
            }
        }
    }

    /// Fire the delayed gallery transition if it is due
    pub fn poll_timer(&mut self, now: Duration) -> Vec<SideEffect> {
        let Some(pending) = self.timer.take_due(now) else {
            return Vec::new();
        };

        // Only meaningful if nothing moved us out of exploding meanwhile
        if self.state != AppState::Exploding {
            debug!("Dropping stale transition to {}", pending.target);
            return Vec::new();
        }

        self.enter(pending.target);
        vec![SideEffect::Status(pending.target.status_label())]
    }

    fn summon(&mut self) -> Vec<SideEffect> {
        if self.state.is_summoned() {
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(3);
        if self.state.shows_gallery() {
            effects.push(SideEffect::ClearFocus);
        }

        self.timer.cancel();
        self.enter(AppState::Forming);
        effects.push(SideEffect::Cue(ToneCue::Rising));
        effects.push(SideEffect::Status(StatusLabel::Fist));
        effects
    }

    fn release(&mut self, now: Duration) -> Vec<SideEffect> {
        if !self.state.is_summoned() {
            return Vec::new();
        }

        self.enter(AppState::Exploding);
        self.timer.arm(AppState::Gallery, now + self.explode_delay);
        vec![
            SideEffect::Cue(ToneCue::Falling),
            SideEffect::Status(StatusLabel::Palm),
        ]
    }

    fn enter(&mut self, next: AppState) {
        info!("State change: {} -> {}", self.state, next);
        self.state = next;
        self.transitions += 1;
    }
}
