//! Single-slot scheduled transition

use std::time::Duration;

use super::AppState;

/// A transition scheduled for a point on the scene clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub target: AppState,
    pub due: Duration,
    /// Distinguishes successive arms of the timer
    pub generation: u64,
}

/// Holds at most one pending transition. Arming replaces whatever was pending.
#[derive(Debug, Default)]
pub struct TransitionTimer {
    pending: Option<PendingTransition>,
    generation: u64,
}

impl TransitionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `target` at `due`, superseding any pending transition
    pub fn arm(&mut self, target: AppState, due: Duration) -> u64 {
        self.generation += 1;
        if let Some(old) = self.pending.replace(PendingTransition {
            target,
            due,
            generation: self.generation,
        }) {
            tracing::debug!("Superseded pending transition to {} (gen {})", old.target, old.generation);
        }
        self.generation
    }

    /// Drop the pending transition, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the pending transition once `now` reaches its due time
    pub fn take_due(&mut self, now: Duration) -> Option<PendingTransition> {
        match self.pending {
            Some(p) if now >= p.due => self.pending.take(),
            _ => None,
        }
    }
}
