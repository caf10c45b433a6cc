//! Tactical Coordinate Stabilizer configuration

use serde::{Deserialize, Serialize};

/// Tactical diagram width in tactical units.
pub const DEFAULT_COURT_WIDTH: f32 = 300.0;
/// Tactical diagram height in tactical units.
pub const DEFAULT_COURT_HEIGHT: f32 = 161.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalConfig {
    /// Weight retained from the previous smoothed position (0.0 - 1.0)
    pub smoothing_factor: f32,
    /// Mean keypoint displacement above which a detection is distrusted
    pub match_distance_threshold: f32,
    /// Tactical diagram extent (x)
    pub court_width: f32,
    /// Tactical diagram extent (y)
    pub court_height: f32,
}

impl Default for TacticalConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.8,
            match_distance_threshold: 50.0,
            court_width: DEFAULT_COURT_WIDTH,
            court_height: DEFAULT_COURT_HEIGHT,
        }
    }
}
