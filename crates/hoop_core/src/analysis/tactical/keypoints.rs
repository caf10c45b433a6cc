//! Court keypoint ordering resolution
//!
//! The keypoint detector occasionally returns the landmarks in reversed
//! order (the court seen "from the other side"). Each frame's detection is
//! compared against the last resolved set both as delivered and reversed;
//! the closer ordering is adopted only when it is close enough to be trusted.

use crate::models::KeypointSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What happened to one frame's detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointDecision {
    /// First detection of the video, taken as is
    Initialized,
    /// Accepted in detector order
    Kept,
    /// Accepted after flipping the order
    Reversed,
    /// Too far from the previous set (or wrong size); previous set retained
    Rejected,
    /// No detection (or an empty one) this frame; previous set retained
    Missing,
}

/// Per-video resolver state.
#[derive(Debug, Clone)]
pub struct KeypointResolver {
    threshold: f32,
    resolved: Option<KeypointSet>,
}

impl KeypointResolver {
    pub fn new(match_distance_threshold: f32) -> Self {
        Self {
            threshold: match_distance_threshold,
            resolved: None,
        }
    }

    pub fn current(&self) -> Option<&KeypointSet> {
        self.resolved.as_ref()
    }

    /// Feed one frame's raw detection.
    ///
    /// An empty set carries no landmarks and is treated like a missing one.
    pub fn update(&mut self, detection: Option<&KeypointSet>) -> KeypointDecision {
        let Some(detection) = detection.filter(|d| !d.is_empty()) else {
            return KeypointDecision::Missing;
        };
        let Some(previous) = &self.resolved else {
            self.resolved = Some(detection.clone());
            return KeypointDecision::Initialized;
        };

        let (Some(direct), Some(flipped)) = (
            previous.mean_distance(detection),
            previous.mean_distance_reversed(detection),
        ) else {
            warn!(
                "Keypoints: detection of {} points cannot be matched against {} resolved points",
                detection.len(),
                previous.len()
            );
            return KeypointDecision::Rejected;
        };

        if direct <= flipped && direct < self.threshold {
            self.resolved = Some(detection.clone());
            KeypointDecision::Kept
        } else if flipped < direct && flipped < self.threshold {
            self.resolved = Some(detection.reversed());
            KeypointDecision::Reversed
        } else {
            debug!(
                "Keypoints: rejected (mean distance {:.1} / reversed {:.1})",
                direct, flipped
            );
            KeypointDecision::Rejected
        }
    }
}

/// Resolved keypoints per frame.
///
/// Frames before the first detection resolve to `None`; afterwards every
/// frame carries the latest trusted set.
pub fn resolve_keypoints(
    detections: &[Option<KeypointSet>],
    match_distance_threshold: f32,
) -> (Vec<Option<KeypointSet>>, Vec<KeypointDecision>) {
    let mut resolver = KeypointResolver::new(match_distance_threshold);
    let mut resolved = Vec::with_capacity(detections.len());
    let mut decisions = Vec::with_capacity(detections.len());

    for detection in detections {
        decisions.push(resolver.update(detection.as_ref()));
        resolved.push(resolver.current().cloned());
    }
    (resolved, decisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn set(points: &[(f32, f32)]) -> KeypointSet {
        KeypointSet::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn court() -> KeypointSet {
        set(&[(0.0, 0.0), (60.0, 10.0), (150.0, 80.0), (290.0, 160.0)])
    }

    #[test]
    fn test_reversed_detection_is_flipped_back() {
        let previous = court();
        let detections = vec![Some(previous.clone()), Some(previous.reversed())];
        let (resolved, decisions) = resolve_keypoints(&detections, 50.0);

        assert_eq!(decisions, vec![KeypointDecision::Initialized, KeypointDecision::Reversed]);
        // Same content, order restored
        assert_eq!(resolved[1].as_ref(), Some(&previous));
    }

    #[test]
    fn test_small_drift_accepted() {
        let drifted = set(&[(2.0, 1.0), (61.0, 12.0), (149.0, 83.0), (292.0, 158.0)]);
        let (resolved, decisions) = resolve_keypoints(&[Some(court()), Some(drifted.clone())], 50.0);
        assert_eq!(decisions[1], KeypointDecision::Kept);
        assert_eq!(resolved[1], Some(drifted));
    }

    #[test]
    fn test_distant_detection_rejected() {
        let shifted = set(&[(100.0, 100.0), (160.0, 110.0), (250.0, 180.0), (390.0, 260.0)]);
        let (resolved, decisions) = resolve_keypoints(&[Some(court()), Some(shifted)], 50.0);
        assert_eq!(decisions[1], KeypointDecision::Rejected);
        assert_eq!(resolved[1], Some(court()));
    }

    #[test]
    fn test_missing_frames() {
        let detections = vec![None, Some(court()), None];
        let (resolved, decisions) = resolve_keypoints(&detections, 50.0);
        assert_eq!(resolved[0], None);
        assert_eq!(decisions[2], KeypointDecision::Missing);
        assert_eq!(resolved[2], Some(court()));
    }

    #[test]
    fn test_empty_detection_counts_as_missing() {
        let empty = KeypointSet::new(Vec::new());
        let detections = vec![Some(empty.clone()), Some(court()), Some(empty), Some(court())];
        let (resolved, decisions) = resolve_keypoints(&detections, 50.0);

        assert_eq!(
            decisions,
            vec![
                KeypointDecision::Missing,
                KeypointDecision::Initialized,
                KeypointDecision::Missing,
                KeypointDecision::Kept,
            ]
        );
        assert_eq!(resolved[0], None);
        assert_eq!(resolved[2], Some(court()));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let partial = set(&[(0.0, 0.0), (60.0, 10.0)]);
        let (resolved, decisions) = resolve_keypoints(&[Some(court()), Some(partial)], 50.0);
        assert_eq!(decisions[1], KeypointDecision::Rejected);
        assert_eq!(resolved[1], Some(court()));
    }

    #[test]
    fn test_symmetric_set_keeps_order() {
        // Palindromic layout: both orderings are equally close
        let symmetric = set(&[(0.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        let mut resolver = KeypointResolver::new(50.0);
        resolver.update(Some(&symmetric));
        assert_eq!(resolver.update(Some(&symmetric)), KeypointDecision::Kept);
    }

    #[test]
    fn test_rejection_does_not_move_reference() {
        let far = set(&[(200.0, 0.0), (260.0, 10.0), (350.0, 80.0), (490.0, 160.0)]);
        let near = set(&[(5.0, 0.0), (65.0, 10.0), (155.0, 80.0), (295.0, 160.0)]);
        let (_, decisions) = resolve_keypoints(&[Some(court()), Some(far), Some(near)], 50.0);
        assert_eq!(decisions[1], KeypointDecision::Rejected);
        assert_eq!(decisions[2], KeypointDecision::Kept);
    }
}
