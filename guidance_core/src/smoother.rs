// Exponential smoothing of the tracked target position.
// Not updated on empty frames: the last position persists while health decays.

use crate::types::{NormalizedPoint, SmoothingSettings};

#[derive(Debug, Clone)]
pub struct PositionSmoother {
    alpha: f32,
    position: Option<NormalizedPoint>,
}

impl PositionSmoother {
    pub fn new(settings: SmoothingSettings) -> Self {
        PositionSmoother {
            alpha: settings.alpha,
            position: None,
        }
    }

    /// Blend a new target center in. The first sample is taken as-is.
    pub fn update(&mut self, center: NormalizedPoint) -> Option<NormalizedPoint> {
        if !center.is_finite() {
            return self.position;
        }
        let next = match self.position {
            None => center,
            Some(previous) => previous * self.alpha + center * (1.0 - self.alpha),
        };
        self.position = Some(next);
        self.position
    }

    pub fn position(&self) -> Option<NormalizedPoint> {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_sample_is_taken_directly() {
        let mut smoother = PositionSmoother::new(SmoothingSettings::default());
        assert_eq!(smoother.position(), None);
        let p = smoother.update(NormalizedPoint::new(0.2, 0.7));
        assert_eq!(p, Some(NormalizedPoint::new(0.2, 0.7)));
    }

    #[test]
    fn blends_with_alpha() {
        let mut smoother = PositionSmoother::new(SmoothingSettings { alpha: 0.5 });
        smoother.update(NormalizedPoint::new(0.2, 0.2));
        let p = smoother.update(NormalizedPoint::new(0.6, 0.4)).unwrap();
        assert!((p.x - 0.4).abs() < 1e-6);
        assert!((p.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn non_finite_center_is_ignored() {
        let mut smoother = PositionSmoother::new(SmoothingSettings::default());
        smoother.update(NormalizedPoint::new(0.3, 0.3));
        smoother.update(NormalizedPoint::new(f32::NAN, 0.3));
        assert_eq!(smoother.position(), Some(NormalizedPoint::new(0.3, 0.3)));
    }

    #[test]
    fn reset_clears_position() {
        let mut smoother = PositionSmoother::new(SmoothingSettings::default());
        smoother.update(NormalizedPoint::new(0.3, 0.3));
        smoother.reset();
        assert_eq!(smoother.position(), None);
    }

    proptest! {
        /// A stationary target is converged on and then held without oscillation.
        #[test]
        fn converges_to_stationary_target(
            alpha in 0.0f32..0.6,
            start_x in 0.0f32..1.0,
            start_y in 0.0f32..1.0,
            target_x in 0.0f32..1.0,
            target_y in 0.0f32..1.0,
        ) {
            let mut smoother = PositionSmoother::new(SmoothingSettings { alpha });
            let target = NormalizedPoint::new(target_x, target_y);
            smoother.update(NormalizedPoint::new(start_x, start_y));
            let mut last_distance = f32::MAX;
            for _ in 0..30 {
                let p = smoother.update(target).unwrap();
                let distance = p.distance_to(target);
                prop_assert!(distance <= last_distance + 1e-6);
                last_distance = distance;
            }
            prop_assert!(last_distance < 1e-3);
        }
    }
}
