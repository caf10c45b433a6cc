//! Possession Assigner configuration

use serde::{Deserialize, Serialize};

/// Shortest streak that still hides a single-frame candidate.
pub const MIN_CONSECUTIVE_FRAMES: usize = 2;

/// Shortest vote window in which one frame cannot reach half the buffer.
pub const MIN_VOTE_WINDOW: usize = 3;

/// How raw per-frame candidates are turned into a reported holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizationPolicy {
    /// Promote a candidate after `min_consecutive_frames` identical frames.
    #[default]
    Consecutive,
    /// Report the majority of the last `vote_window` candidates.
    MajorityVote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionConfig {
    /// Stabilization strategy
    pub policy: StabilizationPolicy,
    /// Containment ratio above which a player is a preferred candidate
    pub containment_threshold: f32,
    /// Maximum ball-to-player distance for the fallback rule (px)
    pub possession_distance_px: f32,
    /// Frames a candidate must persist before it is reported (consecutive policy)
    pub min_consecutive_frames: usize,
    /// Sliding buffer length (majority-vote policy)
    pub vote_window: usize,
    /// Frames the previous holder survives a missing ball
    pub grace_frames: usize,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            policy: StabilizationPolicy::Consecutive,
            containment_threshold: 0.8,
            possession_distance_px: 50.0,
            min_consecutive_frames: 11,
            vote_window: 5,
            grace_frames: 3,
        }
    }
}
