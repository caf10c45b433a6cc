//! Per-identity gap filling of tactical positions

use crate::geometry::Point;
use crate::models::{PositionFrame, TrackId};
use std::collections::BTreeMap;

/// Fill every frame an identity is missing from.
///
/// Between two recorded frames the position is interpolated by temporal
/// distance; before the first or after the last recorded frame it is held.
/// An identity never recorded stays absent.
pub fn interpolate_positions(frames: &[PositionFrame]) -> Vec<PositionFrame> {
    let mut tracks: BTreeMap<TrackId, Vec<(usize, Point)>> = BTreeMap::new();
    for (idx, frame) in frames.iter().enumerate() {
        for (&id, &pos) in frame {
            tracks.entry(id).or_default().push((idx, pos));
        }
    }

    let mut out = vec![PositionFrame::new(); frames.len()];
    for (id, samples) in &tracks {
        fill_track(*id, samples, &mut out);
    }
    out
}

/// Write one identity's dense track into `out`. `samples` is sorted by frame.
fn fill_track(id: TrackId, samples: &[(usize, Point)], out: &mut [PositionFrame]) {
    let mut next = 0;
    for (idx, frame) in out.iter_mut().enumerate() {
        while next < samples.len() && samples[next].0 < idx {
            next += 1;
        }

        let pos = match (next.checked_sub(1).map(|p| samples[p]), samples.get(next)) {
            (_, Some(&(at, pos))) if at == idx => pos,
            (Some((i0, p0)), Some(&(i1, p1))) => {
                let t = (idx - i0) as f32 / (i1 - i0) as f32;
                p0.lerp(&p1, t)
            }
            (Some((_, p0)), None) => p0,
            (None, Some(&(_, p1))) => p1,
            (None, None) => continue,
        };
        frame.insert(id, pos);
    }
}
