// Search session: owns the tracker, smoother, and guidance generator for one target.
// Lifecycle: create -> initiate_search -> process_detections* -> reset.

use log::{debug, info};

use crate::candidates::select_target;
use crate::error::EngineError;
use crate::guidance::{Guidance, GuidanceGenerator};
use crate::smoother::PositionSmoother;
use crate::tracker::{ConfirmationTracker, TrackerPhase};
use crate::types::*;

/// Persistent state of the active search. Mutated by one batch at a time.
#[derive(Debug, Clone)]
pub struct SearchSession {
    mode: SearchMode,
    search_value: String,
    epoch: Epoch,
    filter: FilterSettings,
    tracker: ConfirmationTracker,
    smoother: PositionSmoother,
    generator: GuidanceGenerator,
    last: Guidance,
}

impl SearchSession {
    pub fn new(config: &EngineConfig) -> Self {
        SearchSession {
            mode: SearchMode::default(),
            search_value: String::new(),
            epoch: Epoch::default(),
            filter: config.filter,
            tracker: ConfirmationTracker::new(config.tracker),
            smoother: PositionSmoother::new(config.smoothing),
            generator: GuidanceGenerator::new(config.guidance, config.phrase_set()),
            last: Guidance::silent(),
        }
    }

    /// Start a new search, discarding all state of the previous one.
    /// Returns the epoch that batches for this search must carry.
    pub fn initiate_search(
        &mut self,
        mode: SearchMode,
        value: &str,
    ) -> Result<Epoch, EngineError> {
        check_search_value(mode, value)?;

        let epoch = self.reset();
        self.mode = mode;
        self.search_value = value.to_string();
        info!("search started: {:?} {:?} (epoch {})", mode, value, epoch.as_u64());
        Ok(epoch)
    }

    /// Stop the current search. Any batch tagged with an older epoch is dropped afterwards.
    pub fn reset(&mut self) -> Epoch {
        self.search_value.clear();
        self.tracker.reset();
        self.smoother.reset();
        self.last = Guidance::silent();
        self.epoch = self.epoch.next();
        self.epoch
    }

    pub fn is_active(&self) -> bool {
        !self.search_value.is_empty()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn phase(&self) -> TrackerPhase {
        self.tracker.phase()
    }

    pub fn generator(&self) -> &GuidanceGenerator {
        &self.generator
    }

    /// Process one frame's batch and return this frame's guidance.
    ///
    /// A batch of the wrong kind for the current mode counts as a frame with no candidates.
    pub fn process_detections(&mut self, batch: &DetectionBatch) -> Guidance {
        if !self.is_active() {
            return Guidance::silent();
        }

        let target = if batch.mode() == self.mode {
            select_target(batch, &self.search_value, &self.filter)
        } else {
            None
        };

        self.tracker.observe(target.is_some(), self.mode);
        if let Some(center) = target {
            self.smoother.update(center);
        }

        self.last = self.generator.generate(
            self.smoother.position(),
            self.tracker.is_locked(),
            self.mode,
        );
        self.last.clone()
    }

    /// Like `process_detections`, but silently drops batches produced for another session.
    pub fn process_tagged(&mut self, epoch: Epoch, batch: &DetectionBatch) -> Option<Guidance> {
        if epoch != self.epoch {
            debug!(
                "dropping stale batch (epoch {} != {})",
                epoch.as_u64(),
                self.epoch.as_u64()
            );
            return None;
        }
        if !self.is_active() || batch.mode() != self.mode {
            debug!("dropping {:?} batch for {:?} search", batch.mode(), self.mode);
            return None;
        }
        Some(self.process_detections(batch))
    }

    pub fn last_guidance(&self) -> &Guidance {
        &self.last
    }

    pub fn state(&self) -> SearchState {
        SearchState {
            mode: self.mode,
            search_value: self.search_value.clone(),
            health: self.tracker.health(),
            smoothed_position: self.smoother.position(),
            speech_text: self.last.speech_text.clone(),
            feedback_intensity: self.last.feedback_intensity,
            epoch: self.epoch,
        }
    }
}

/// Reject blank search values. Accepted values are matched as given, whitespace included.
pub fn check_search_value(mode: SearchMode, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidSearch {
            mode,
            message: "search value is empty".to_string(),
        });
    }
    Ok(())
}
