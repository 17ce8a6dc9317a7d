// Strong typing for frame geometry, detections, session state, and engine settings.
// Coordinates are normalized to the unit square, origin bottom-left, y growing toward the image top.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::guidance::{Language, PhraseSet};
use crate::vocabulary::VocabularyKind;

/// Normalized position on the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    /// Wire sentinel for "no established position".
    pub const UNSET: NormalizedPoint = NormalizedPoint { x: -1.0, y: -1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        NormalizedPoint { x, y }
    }

    pub fn center() -> Self {
        NormalizedPoint { x: 0.5, y: 0.5 }
    }

    pub fn distance_to(&self, other: NormalizedPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for NormalizedPoint {
    type Output = NormalizedPoint;

    fn add(self, rhs: NormalizedPoint) -> NormalizedPoint {
        NormalizedPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for NormalizedPoint {
    type Output = NormalizedPoint;

    fn sub(self, rhs: NormalizedPoint) -> NormalizedPoint {
        NormalizedPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for NormalizedPoint {
    type Output = NormalizedPoint;

    fn mul(self, rhs: f32) -> NormalizedPoint {
        NormalizedPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for NormalizedPoint {
    type Output = NormalizedPoint;

    fn div(self, rhs: f32) -> NormalizedPoint {
        NormalizedPoint::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned bounding box in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        NormalizedRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> NormalizedPoint {
        let origin = NormalizedPoint::new(self.x, self.y);
        let far_corner = NormalizedPoint::new(self.x + self.width, self.y + self.height);
        (origin + far_corner) / 2.0
    }

    /// Finite origin and a non-negative, finite size.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// One object detection from the upstream detector (top label already chosen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    pub label: String,
    #[serde(default)]
    pub confidence: f32,
    pub bounding_box: NormalizedRect,
}

impl ObjectDetection {
    pub fn new(label: impl Into<String>, confidence: f32, bounding_box: NormalizedRect) -> Self {
        ObjectDetection {
            label: label.into(),
            confidence,
            bounding_box,
        }
    }
}

/// One recognized text region (top candidate string already chosen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    pub text: String,
    pub bounding_box: NormalizedRect,
}

impl TextObservation {
    pub fn new(text: impl Into<String>, bounding_box: NormalizedRect) -> Self {
        TextObservation {
            text: text.into(),
            bounding_box,
        }
    }
}

/// Per-frame batch delivered by the capture/inference pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum DetectionBatch {
    Objects(Vec<ObjectDetection>),
    Text(Vec<TextObservation>),
}

impl DetectionBatch {
    /// Search mode this batch can feed.
    pub fn mode(&self) -> SearchMode {
        match self {
            DetectionBatch::Objects(_) => SearchMode::ObjectSearch,
            DetectionBatch::Text(_) => SearchMode::TextSearch,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DetectionBatch::Objects(items) => items.len(),
            DetectionBatch::Text(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the active search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Exact, case-insensitive match on an object's top label.
    #[default]
    ObjectSearch,
    /// Case-insensitive substring match on recognized text.
    TextSearch,
}

/// Session generation. Bumped on every new search and on reset so that
/// results computed for an older session can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Epoch(u64);

impl Epoch {
    pub fn new(value: u64) -> Self {
        Epoch(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

/// Snapshot of the search session, as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub mode: SearchMode,
    pub search_value: String,
    pub health: u32,
    /// `None` until the first successful match.
    pub smoothed_position: Option<NormalizedPoint>,
    pub speech_text: String,
    pub feedback_intensity: f32,
    pub epoch: Epoch,
}

impl SearchState {
    /// Smoothed position, with `NormalizedPoint::UNSET` standing in for "none yet".
    pub fn position_or_unset(&self) -> NormalizedPoint {
        self.smoothed_position.unwrap_or(NormalizedPoint::UNSET)
    }
}

/// Snapshot of the read-aloud session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadState {
    pub blocks: Vec<String>,
    pub pointer: i32,
    pub autoplay: bool,
    pub current_text: String,
}

/// Start-search command from the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCommand {
    pub mode: SearchMode,
    pub value: String,
}

/// Foreground task of the assistant. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTask {
    #[default]
    Idle,
    SearchObject,
    SearchText,
    ReadText,
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub smoothing: SmoothingSettings,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub guidance: GuidanceSettings,
    #[serde(default)]
    pub language: Language,
    /// Overrides the built-in phrases for `language` when present.
    #[serde(default)]
    pub phrases: Option<PhraseSet>,
    /// Phrase-to-label table used for voice-started searches.
    #[serde(default)]
    pub vocabulary: VocabularyKind,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.tracker.validate()?;
        self.smoothing.validate()?;
        self.filter.validate()?;
        self.guidance.validate()
    }

    /// Phrases in effect: the explicit override, or the built-ins for `language`.
    pub fn phrase_set(&self) -> PhraseSet {
        self.phrases
            .clone()
            .unwrap_or_else(|| PhraseSet::for_language(self.language))
    }
}

/// Hysteresis constants of the confirmation tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSettings {
    #[serde(default = "default_health_max")]
    pub health_max: u32,
    /// Added on every frame with at least one surviving candidate.
    #[serde(default = "default_gain")]
    pub gain: u32,
    /// Subtracted on an empty object-search frame.
    #[serde(default = "default_object_decay")]
    pub object_decay: u32,
    /// Subtracted on an empty text-search frame. Text matches are less persistent.
    #[serde(default = "default_text_decay")]
    pub text_decay: u32,
    /// Guidance is emitted only while health is strictly above this value.
    #[serde(default = "default_lock_threshold")]
    pub lock_threshold: u32,
}

impl TrackerSettings {
    pub fn decay_for(&self, mode: SearchMode) -> u32 {
        match mode {
            SearchMode::ObjectSearch => self.object_decay,
            SearchMode::TextSearch => self.text_decay,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.health_max == 0 {
            return Err(EngineError::InvalidConfig(
                "tracker.health_max must be positive".to_string(),
            ));
        }
        if self.lock_threshold >= self.health_max {
            return Err(EngineError::InvalidConfig(format!(
                "tracker.lock_threshold ({}) must be below health_max ({})",
                self.lock_threshold, self.health_max
            )));
        }
        if self.gain == 0 || self.object_decay == 0 || self.text_decay == 0 {
            return Err(EngineError::InvalidConfig(
                "tracker gain and decay values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            health_max: default_health_max(),
            gain: default_gain(),
            object_decay: default_object_decay(),
            text_decay: default_text_decay(),
            lock_threshold: default_lock_threshold(),
        }
    }
}

fn default_health_max() -> u32 {
    10
}

fn default_gain() -> u32 {
    4
}

fn default_object_decay() -> u32 {
    1
}

fn default_text_decay() -> u32 {
    2
}

fn default_lock_threshold() -> u32 {
    4
}

/// Position smoothing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingSettings {
    /// Weight kept from the previous smoothed position, in `[0, 1)`.
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

impl SmoothingSettings {
    fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(EngineError::InvalidConfig(format!(
                "smoothing.alpha must be in [0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        SmoothingSettings {
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> f32 {
    0.5
}

/// False-positive filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Object boxes wider or taller than this fraction of the frame are dropped.
    #[serde(default = "default_max_box_extent")]
    pub max_box_extent: f32,
}

impl FilterSettings {
    fn validate(&self) -> Result<(), EngineError> {
        if !(self.max_box_extent > 0.0 && self.max_box_extent <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "filter.max_box_extent must be in (0, 1], got {}",
                self.max_box_extent
            )));
        }
        Ok(())
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            max_box_extent: default_max_box_extent(),
        }
    }
}

fn default_max_box_extent() -> f32 {
    0.9
}

/// Guidance output settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidanceSettings {
    /// Dead zone radius around the frame center, per axis.
    #[serde(default = "default_center_radius")]
    pub center_radius: f32,
    /// Intensity above which the presentation layer should pulse repeatedly.
    #[serde(default = "default_repeat_threshold")]
    pub repeat_threshold: f32,
}

impl GuidanceSettings {
    fn validate(&self) -> Result<(), EngineError> {
        if !(self.center_radius >= 0.0 && self.center_radius < 0.5) {
            return Err(EngineError::InvalidConfig(format!(
                "guidance.center_radius must be in [0, 0.5), got {}",
                self.center_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.repeat_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "guidance.repeat_threshold must be in [0, 1], got {}",
                self.repeat_threshold
            )));
        }
        Ok(())
    }
}

impl Default for GuidanceSettings {
    fn default() -> Self {
        GuidanceSettings {
            center_radius: default_center_radius(),
            repeat_threshold: default_repeat_threshold(),
        }
    }
}

fn default_center_radius() -> f32 {
    0.05
}

fn default_repeat_threshold() -> f32 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = NormalizedPoint::new(0.2, 0.4);
        let b = NormalizedPoint::new(0.6, 0.8);
        let mid = (a + b) / 2.0;
        assert!((mid.x - 0.4).abs() < 1e-6);
        assert!((mid.y - 0.6).abs() < 1e-6);
        let scaled = (b - a) * 0.5;
        assert!((scaled.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rect_center_and_validity() {
        let rect = NormalizedRect::new(0.2, 0.2, 0.4, 0.2);
        let center = rect.center();
        assert!((center.x - 0.4).abs() < 1e-6);
        assert!((center.y - 0.3).abs() < 1e-6);
        assert!(rect.is_well_formed());
        assert!(!NormalizedRect::new(0.1, 0.1, -0.2, 0.1).is_well_formed());
        assert!(!NormalizedRect::new(f32::NAN, 0.1, 0.2, 0.1).is_well_formed());
    }

    #[test]
    fn config_defaults_from_empty_json() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.tracker, TrackerSettings::default());
        assert_eq!(config.tracker.health_max, 10);
        assert_eq!(config.tracker.decay_for(SearchMode::TextSearch), 2);
        assert!((config.smoothing.alpha - 0.5).abs() < 1e-6);
        assert!((config.filter.max_box_extent - 0.9).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_threshold_above_max() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"tracker":{"lock_threshold":12}}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn batch_json_shape() {
        let json = r#"{"kind":"text","items":[{"text":"the cat sat","bounding_box":{"x":0.1,"y":0.1,"width":0.2,"height":0.1}}]}"#;
        let batch: DetectionBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.mode(), SearchMode::TextSearch);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn unset_position_uses_sentinel() {
        let state = SearchState {
            mode: SearchMode::ObjectSearch,
            search_value: String::new(),
            health: 0,
            smoothed_position: None,
            speech_text: String::new(),
            feedback_intensity: 0.0,
            epoch: Epoch::default(),
        };
        assert_eq!(state.position_or_unset(), NormalizedPoint::new(-1.0, -1.0));
    }

    #[test]
    fn epoch_advances() {
        let epoch = Epoch::default();
        assert_eq!(epoch.next().as_u64(), 1);
    }
}
