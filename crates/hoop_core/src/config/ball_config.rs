//! Ball Track Cleaner configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTrackConfig {
    /// Maximum plausible top-left displacement per elapsed frame (px/frame)
    pub max_speed_px_per_frame: f32,
}

impl Default for BallTrackConfig {
    fn default() -> Self {
        Self {
            max_speed_px_per_frame: 25.0,
        }
    }
}
