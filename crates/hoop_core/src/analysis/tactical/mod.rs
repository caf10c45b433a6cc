//! # Tactical Coordinate Stabilizer
//!
//! Cleans up the per-frame projection of players onto the tactical diagram.
//!
//! ## Algorithm
//! 1. Fill gaps in each identity's track by temporal interpolation.
//! 2. Exponentially smooth each identity, clamping to the diagram extent.
//! 3. Resolve the court keypoint ordering frame to frame so a reversed
//!    detection does not relabel the court.
//!
//! Positions and keypoints are processed independently but must describe the
//! same frames.

pub mod interpolation;
pub mod keypoints;
pub mod smoothing;

pub use interpolation::interpolate_positions;
pub use keypoints::{resolve_keypoints, KeypointDecision, KeypointResolver};
pub use smoothing::{smooth_positions, PositionSmoother};

use crate::config::TacticalConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{KeypointSet, PositionFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output of [`stabilize`], one entry per frame in every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StabilizedTactics {
    pub positions: Vec<PositionFrame>,
    pub keypoints: Vec<Option<KeypointSet>>,
    pub keypoint_decisions: Vec<KeypointDecision>,
}

impl StabilizedTactics {
    /// Frames whose keypoint detection was flipped back into order.
    pub fn reversed_frames(&self) -> Vec<usize> {
        self.keypoint_decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == KeypointDecision::Reversed)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Interpolate, smooth and clamp positions; resolve keypoint ordering.
pub fn stabilize(
    positions: &[PositionFrame],
    keypoints: &[Option<KeypointSet>],
    config: &TacticalConfig,
) -> Result<StabilizedTactics> {
    AnalysisError::check_len("court_keypoints", positions.len(), keypoints.len())?;

    let interpolated = interpolate_positions(positions);
    let smoothed = smooth_positions(&interpolated, config);
    let (resolved, decisions) = resolve_keypoints(keypoints, config.match_distance_threshold);

    let result = StabilizedTactics {
        positions: smoothed,
        keypoints: resolved,
        keypoint_decisions: decisions,
    };
    debug!(
        "Tactical: {} frames, {} keypoint reversals",
        positions.len(),
        result.reversed_frames().len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::models::TrackId;

    #[test]
    fn test_interpolated_then_smoothed() {
        let positions = vec![
            PositionFrame::from([(TrackId(3), Point::new(100.0, 50.0))]),
            PositionFrame::new(),
            PositionFrame::from([(TrackId(3), Point::new(120.0, 50.0))]),
        ];
        let keypoints = vec![None; 3];
        let out = stabilize(&positions, &keypoints, &TacticalConfig::default()).unwrap();

        // Frame 1 is interpolated to 110 then blended with 100
        let p = out.positions[1][&TrackId(3)];
        assert!((p.x - 102.0).abs() < 1e-3);
        assert_eq!(out.keypoints, vec![None; 3]);
    }

    #[test]
    fn test_reversal_reported() {
        let court = KeypointSet::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 20.0)]);
        let keypoints = vec![Some(court.clone()), Some(court.reversed()), None];
        let positions = vec![PositionFrame::new(); 3];
        let out = stabilize(&positions, &keypoints, &TacticalConfig::default()).unwrap();

        assert_eq!(out.reversed_frames(), vec![1]);
        assert_eq!(out.keypoints[2], Some(court));
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let err = stabilize(&[PositionFrame::new()], &[], &TacticalConfig::default()).unwrap_err();
        assert!(err.is_precondition());
    }
}
