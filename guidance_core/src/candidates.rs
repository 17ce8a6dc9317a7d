// Candidate extraction, false-positive filtering, and nearest-to-center selection.
// All functions are pure and order-preserving.

use crate::types::*;

/// Anything with a normalized bounding box that can be tracked as the search target.
pub trait Candidate {
    fn bounding_box(&self) -> NormalizedRect;

    fn center(&self) -> NormalizedPoint {
        self.bounding_box().center()
    }
}

impl Candidate for ObjectDetection {
    fn bounding_box(&self) -> NormalizedRect {
        self.bounding_box
    }
}

impl Candidate for TextObservation {
    fn bounding_box(&self) -> NormalizedRect {
        self.bounding_box
    }
}

/// Keep detections whose label equals `search_value`, ignoring case.
pub fn extract_objects<'a>(
    detections: &'a [ObjectDetection],
    search_value: &str,
) -> Vec<&'a ObjectDetection> {
    if search_value.is_empty() {
        return Vec::new();
    }
    let wanted = search_value.to_lowercase();
    detections
        .iter()
        .filter(|d| d.label.to_lowercase() == wanted)
        .collect()
}

/// Keep text regions containing `search_value`, ignoring case.
pub fn extract_text<'a>(
    observations: &'a [TextObservation],
    search_value: &str,
) -> Vec<&'a TextObservation> {
    if search_value.is_empty() {
        return Vec::new();
    }
    let wanted = search_value.to_lowercase();
    observations
        .iter()
        .filter(|o| o.text.to_lowercase().contains(&wanted))
        .collect()
}

/// Drop object boxes spanning most of the frame; these are almost always mis-detections.
pub fn filter_false_positives<'a>(
    candidates: Vec<&'a ObjectDetection>,
    settings: &FilterSettings,
) -> Vec<&'a ObjectDetection> {
    candidates
        .into_iter()
        .filter(|c| {
            c.bounding_box.width <= settings.max_box_extent
                && c.bounding_box.height <= settings.max_box_extent
        })
        .collect()
}

/// Drop candidates with NaN/infinite coordinates or negative size.
pub fn discard_malformed<C: Candidate + ?Sized>(candidates: Vec<&C>) -> Vec<&C> {
    candidates
        .into_iter()
        .filter(|c| c.bounding_box().is_well_formed())
        .collect()
}

/// Candidate whose box center is closest to the frame center. Ties keep the earliest.
///
/// Callers only select from a non-empty survivor list.
pub fn nearest_to_center<'a, C: Candidate + ?Sized>(candidates: &[&'a C]) -> Option<&'a C> {
    debug_assert!(
        !candidates.is_empty(),
        "nearest_to_center called without candidates"
    );
    let frame_center = NormalizedPoint::center();
    let mut best: Option<(&'a C, f32)> = None;

    for &candidate in candidates {
        let distance = candidate.center().distance_to(frame_center);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Run the full extractor → filter → selector chain for one batch.
/// Returns the chosen target center, or `None` when nothing survived.
pub fn select_target(
    batch: &DetectionBatch,
    search_value: &str,
    settings: &FilterSettings,
) -> Option<NormalizedPoint> {
    match batch {
        DetectionBatch::Objects(detections) => {
            let matches = extract_objects(detections, search_value);
            let survivors = filter_false_positives(discard_malformed(matches), settings);
            if survivors.is_empty() {
                return None;
            }
            nearest_to_center(&survivors).map(|c| c.center())
        }
        DetectionBatch::Text(observations) => {
            let survivors = discard_malformed(extract_text(observations, search_value));
            if survivors.is_empty() {
                return None;
            }
            nearest_to_center(&survivors).map(|c| c.center())
        }
    }
}
