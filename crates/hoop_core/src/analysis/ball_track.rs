//! # Ball Track Cleaner
//!
//! Turns the raw, intermittent ball detections into a dense per-frame track.
//!
//! ## Algorithm
//! 1. Walk the frames keeping the index of the last accepted box. A detection
//!    whose top-left corner moved more than `max_speed × frames_elapsed` from
//!    the last accepted box is rejected (a shoe or the hoop mistaken for the
//!    ball); otherwise it is accepted and becomes the new reference.
//! 2. Fill every remaining gap by linear interpolation between the accepted
//!    neighbours, coordinate by coordinate.
//! 3. Gaps before the first / after the last accepted box repeat that box.
//!
//! Running the cleaner on its own output changes nothing: interpolated steps
//! never exceed the speed that licensed the surrounding detections.

use crate::geometry::BBox;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Slack on the jump test so f32 rounding of interpolated steps never
/// rejects a box on a second pass.
const JUMP_TOLERANCE_PX: f32 = 1e-3;

/// Whether the cleaned track contains anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// At least one detection was accepted; every frame has a box.
    Tracked,
    /// No detection survived; every frame is `None`.
    NothingToInterpolate,
}

/// Output of [`clean`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedBallTrack {
    /// One entry per input frame
    pub boxes: Vec<Option<BBox>>,
    /// Frames whose detection was dropped as implausible
    pub rejected_frames: Vec<usize>,
    pub status: TrackStatus,
}

impl CleanedBallTrack {
    pub fn is_empty(&self) -> bool {
        self.status == TrackStatus::NothingToInterpolate
    }
}

/// Reject implausible jumps, then interpolate.
///
/// # Arguments
/// * `raw` - One optional ball box per frame
/// * `max_speed_px_per_frame` - Largest plausible top-left displacement per elapsed frame
pub fn clean(raw: &[Option<BBox>], max_speed_px_per_frame: f32) -> CleanedBallTrack {
    let (accepted, rejected_frames) = reject_outliers(raw, max_speed_px_per_frame);

    if accepted.iter().all(Option::is_none) {
        if !raw.is_empty() {
            warn!(
                "Ball track: no usable detection in {} frames, nothing to interpolate",
                raw.len()
            );
        }
        return CleanedBallTrack {
            boxes: vec![None; raw.len()],
            rejected_frames,
            status: TrackStatus::NothingToInterpolate,
        };
    }

    debug!(
        "Ball track: {} frames, {} detections rejected",
        raw.len(),
        rejected_frames.len()
    );

    CleanedBallTrack {
        boxes: interpolate_gaps(&accepted),
        rejected_frames,
        status: TrackStatus::Tracked,
    }
}

/// Motion-plausibility pass. Returns the surviving detections and the
/// indices of the rejected ones.
fn reject_outliers(raw: &[Option<BBox>], max_speed: f32) -> (Vec<Option<BBox>>, Vec<usize>) {
    let mut accepted = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    let mut last: Option<(usize, BBox)> = None;

    for (idx, detection) in raw.iter().enumerate() {
        let Some(bbox) = detection else {
            accepted.push(None);
            continue;
        };

        if let Some((last_idx, last_box)) = last {
            let elapsed = (idx - last_idx) as f32;
            let displacement = last_box.top_left().distance_to(&bbox.top_left());
            if displacement > max_speed * elapsed + JUMP_TOLERANCE_PX {
                debug!(
                    "Ball frame {}: jump of {:.1}px over {} frames rejected",
                    idx, displacement, elapsed
                );
                rejected.push(idx);
                accepted.push(None);
                continue;
            }
        }

        last = Some((idx, *bbox));
        accepted.push(Some(*bbox));
    }

    (accepted, rejected)
}

/// Fill `None` entries from the nearest accepted neighbours.
fn interpolate_gaps(accepted: &[Option<BBox>]) -> Vec<Option<BBox>> {
    let known: Vec<(usize, BBox)> = accepted
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.map(|b| (i, b)))
        .collect();

    let mut out = Vec::with_capacity(accepted.len());
    // Index into `known` of the first accepted frame at or after the cursor
    let mut next = 0;

    for idx in 0..accepted.len() {
        while next < known.len() && known[next].0 < idx {
            next += 1;
        }

        let filled = match (next.checked_sub(1).map(|p| known[p]), known.get(next)) {
            (_, Some(&(at, bbox))) if at == idx => Some(bbox),
            (Some((i0, b0)), Some(&(i1, b1))) => {
                let t = (idx - i0) as f32 / (i1 - i0) as f32;
                Some(b0.lerp(&b1, t))
            }
            (Some((_, b0)), None) => Some(b0),
            (None, Some(&(_, b1))) => Some(b1),
            (None, None) => None,
        };
        out.push(filled);
    }

    out
}
