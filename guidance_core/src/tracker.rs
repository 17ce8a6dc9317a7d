// Confirmation tracker: integrates per-frame presence into a bounded health counter.
// Rule: a single-frame detection never produces guidance on its own.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::{SearchMode, TrackerSettings};

/// Conceptual hysteresis state derived from health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerPhase {
    /// Health is zero; nothing has been seen recently.
    Idle,
    /// Some evidence, not yet enough to guide.
    Acquiring,
    /// Health above the lock threshold; guidance is active.
    Locked,
}

/// Hysteresis counter for one search session.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker {
    settings: TrackerSettings,
    health: u32,
}

impl ConfirmationTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        ConfirmationTracker {
            settings,
            health: 0,
        }
    }

    /// Record one frame. `matched` is true when at least one candidate survived filtering.
    pub fn observe(&mut self, matched: bool, mode: SearchMode) -> TrackerPhase {
        let before = self.phase();

        self.health = if matched {
            self.health
                .saturating_add(self.settings.gain)
                .min(self.settings.health_max)
        } else {
            self.health.saturating_sub(self.settings.decay_for(mode))
        };

        let after = self.phase();
        if before != after {
            debug!(
                "tracker {:?} -> {:?} (health {}/{})",
                before, after, self.health, self.settings.health_max
            );
        }
        after
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_locked(&self) -> bool {
        self.health > self.settings.lock_threshold
    }

    pub fn phase(&self) -> TrackerPhase {
        if self.health == 0 {
            TrackerPhase::Idle
        } else if self.is_locked() {
            TrackerPhase::Locked
        } else {
            TrackerPhase::Acquiring
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn reset(&mut self) {
        self.health = 0;
    }
}
