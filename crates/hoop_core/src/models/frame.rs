//! Per-frame records
//!
//! Every per-frame sequence in this crate is a `Vec` indexed by frame number.
//! A frame without a detection holds an explicit empty value at its index;
//! frames are never omitted.

use super::track::{Team, TrackId};
use crate::geometry::{BBox, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player boxes for one frame. Ordered by id so tie-breaks are deterministic.
pub type PlayerFrame = BTreeMap<TrackId, BBox>;

/// Team labels for one frame.
pub type TeamFrame = BTreeMap<TrackId, Team>;

/// Tactical-space positions for one frame.
pub type PositionFrame = BTreeMap<TrackId, Point>;

/// Ball holder for one frame; `None` is "no holder".
pub type Holder = Option<TrackId>;

/// Event attribution for one frame; `None` is "no event".
pub type FrameEvent = Option<Team>;

/// Ordered court landmarks detected in one frame.
///
/// Index `i` always refers to the same landmark label as index `i` of the
/// tactical diagram's reference set, unless the detector delivered the set
/// reversed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeypointSet {
    pub points: Vec<Point>,
}

impl KeypointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Same points, index order flipped.
    pub fn reversed(&self) -> KeypointSet {
        KeypointSet::new(self.points.iter().rev().copied().collect())
    }

    /// Mean distance between points at equal indices.
    ///
    /// `None` when the sets differ in size or are empty.
    pub fn mean_distance(&self, other: &KeypointSet) -> Option<f32> {
        if self.points.len() != other.points.len() || self.points.is_empty() {
            return None;
        }
        let total: f32 = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| a.distance_to(b))
            .sum();
        Some(total / self.points.len() as f32)
    }

    /// Mean distance against `other` read in reverse order.
    pub fn mean_distance_reversed(&self, other: &KeypointSet) -> Option<f32> {
        if self.points.len() != other.points.len() || self.points.is_empty() {
            return None;
        }
        let total: f32 = self
            .points
            .iter()
            .zip(other.points.iter().rev())
            .map(|(a, b)| a.distance_to(b))
            .sum();
        Some(total / self.points.len() as f32)
    }
}

impl From<Vec<Point>> for KeypointSet {
    fn from(points: Vec<Point>) -> Self {
        KeypointSet::new(points)
    }
}

/// Everything the upstream detector, tracker and classifier produced for one
/// video, column-oriented.
///
/// `players`, `ball` and `teams` are required and must have one entry per
/// frame. `tactical_positions` and `court_keypoints` may both be left empty,
/// in which case tactical stabilization is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub players: Vec<PlayerFrame>,
    pub ball: Vec<Option<BBox>>,
    pub teams: Vec<TeamFrame>,
    #[serde(default)]
    pub tactical_positions: Vec<PositionFrame>,
    #[serde(default)]
    pub court_keypoints: Vec<Option<KeypointSet>>,
}

impl AnalysisInput {
    /// Video length in frames, taken from the player track.
    pub fn frame_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_tactical_data(&self) -> bool {
        !self.tactical_positions.is_empty() || !self.court_keypoints.is_empty()
    }
}
