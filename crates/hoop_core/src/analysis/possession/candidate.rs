//! Per-frame candidate selection
//!
//! Answers "who would hold the ball if we only looked at this frame". No
//! memory; the stabilization policies decide what gets reported.

use crate::config::PossessionConfig;
use crate::geometry::{containment_ratio, BBox, Point};
use crate::models::{Holder, PlayerFrame, TrackId};

/// Diagnostic points of a player box relative to a ball center.
///
/// Corners, edge midpoints and the center, plus the projections of
/// `ball_center` onto the box boundary when the center lies strictly inside
/// the box's vertical or horizontal span.
pub fn key_points(player: &BBox, ball_center: Point) -> Vec<Point> {
    let BBox { x1, y1, x2, y2 } = *player;
    let center = player.center();

    let mut points = vec![
        Point::new(x1, y1),
        Point::new(x2, y1),
        Point::new(x1, y2),
        Point::new(x2, y2),
        Point::new(center.x, y1),
        Point::new(center.x, y2),
        Point::new(x1, center.y),
        Point::new(x2, center.y),
        center,
    ];

    if y1 < ball_center.y && ball_center.y < y2 {
        points.push(Point::new(x1, ball_center.y));
        points.push(Point::new(x2, ball_center.y));
    }
    if x1 < ball_center.x && ball_center.x < x2 {
        points.push(Point::new(ball_center.x, y1));
        points.push(Point::new(ball_center.x, y2));
    }

    points
}

/// Smallest distance from `ball_center` to any key point of `player`.
pub fn min_key_point_distance(player: &BBox, ball_center: Point) -> f32 {
    key_points(player, ball_center)
        .iter()
        .map(|p| p.distance_to(&ball_center))
        .fold(f32::INFINITY, f32::min)
}

/// Raw holder candidate for one frame.
///
/// Containment above the threshold wins outright (highest ratio first);
/// otherwise the nearest player within `possession_distance_px`. Ties go to
/// the lowest track id.
pub fn select_candidate(players: &PlayerFrame, ball: &BBox, config: &PossessionConfig) -> Holder {
    // BTreeMap iteration is ascending by id, so strict comparisons keep the
    // lowest id on ties.
    let mut best_contained: Option<(TrackId, f32)> = None;
    for (&id, player) in players {
        let ratio = containment_ratio(player, ball);
        if ratio > config.containment_threshold
            && best_contained.map_or(true, |(_, best)| ratio > best)
        {
            best_contained = Some((id, ratio));
        }
    }
    if let Some((id, _)) = best_contained {
        return Some(id);
    }

    let ball_center = ball.center();
    let mut nearest: Option<(TrackId, f32)> = None;
    for (&id, player) in players {
        let dist = min_key_point_distance(player, ball_center);
        if dist < config.possession_distance_px && nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((id, dist));
        }
    }
    nearest.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(entries: &[(u32, BBox)]) -> PlayerFrame {
        entries.iter().map(|&(id, b)| (TrackId(id), b)).collect()
    }

    #[test]
    fn test_key_points_include_projections() {
        let player = BBox::new(0.0, 0.0, 40.0, 100.0);
        // Center within the vertical span only
        let pts = key_points(&player, Point::new(60.0, 30.0));
        assert_eq!(pts.len(), 11);
        assert!(pts.contains(&Point::new(40.0, 30.0)));

        // Within both spans
        assert_eq!(key_points(&player, Point::new(20.0, 30.0)).len(), 13);
        // Outside both
        assert_eq!(key_points(&player, Point::new(80.0, 130.0)).len(), 9);
    }

    #[test]
    fn test_side_projection_beats_corners() {
        // Ball level with the player's waist, 10px off the right edge
        let player = BBox::new(0.0, 0.0, 40.0, 100.0);
        let d = min_key_point_distance(&player, Point::new(50.0, 30.0));
        assert!((d - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_containment_precedence() {
        let ball = BBox::new(100.0, 100.0, 110.0, 110.0);
        // #2 fully contains the ball, nearest key point 15px away
        let container = BBox::new(90.0, 90.0, 250.0, 250.0);
        // #1 only clips a corner of the ball, its corner under 3px away
        let neighbour = BBox::new(107.0, 107.0, 140.0, 190.0);
        assert!(containment_ratio(&neighbour, &ball) <= 0.8);

        let frame = players(&[(1, neighbour), (2, container)]);
        let cfg = PossessionConfig::default();
        assert_eq!(select_candidate(&frame, &ball, &cfg), Some(TrackId(2)));
    }

    #[test]
    fn test_highest_containment_wins() {
        let ball = BBox::new(100.0, 100.0, 110.0, 110.0);
        let full = BBox::new(90.0, 90.0, 120.0, 150.0);
        let most = BBox::new(101.0, 90.0, 130.0, 150.0);
        let frame = players(&[(3, most), (8, full)]);
        assert_eq!(
            select_candidate(&frame, &ball, &PossessionConfig::default()),
            Some(TrackId(8))
        );
    }

    #[test]
    fn test_distance_fallback_and_threshold() {
        let ball = BBox::new(100.0, 100.0, 110.0, 110.0);
        let cfg = PossessionConfig::default();

        // Right edge 30px left of the ball center, at ball height
        let near = players(&[(4, BBox::new(0.0, 50.0, 75.0, 200.0))]);
        assert_eq!(select_candidate(&near, &ball, &cfg), Some(TrackId(4)));

        // 60px away
        let far = players(&[(4, BBox::new(0.0, 50.0, 45.0, 200.0))]);
        assert_eq!(select_candidate(&far, &ball, &cfg), None);
    }

    #[test]
    fn test_equal_distance_prefers_lowest_id() {
        let ball = BBox::new(100.0, 100.0, 110.0, 110.0);
        // Mirror images 20px either side of the ball center
        let left = BBox::new(0.0, 50.0, 85.0, 200.0);
        let right = BBox::new(125.0, 50.0, 210.0, 200.0);
        let frame = players(&[(9, left), (4, right)]);
        assert_eq!(
            select_candidate(&frame, &ball, &PossessionConfig::default()),
            Some(TrackId(4))
        );
    }

    #[test]
    fn test_degenerate_ball_uses_distance() {
        let ball = BBox::new(100.0, 100.0, 100.0, 100.0);
        let frame = players(&[(2, BBox::new(90.0, 90.0, 120.0, 150.0))]);
        assert_eq!(
            select_candidate(&frame, &ball, &PossessionConfig::default()),
            Some(TrackId(2))
        );
    }

    #[test]
    fn test_no_players() {
        let ball = BBox::new(100.0, 100.0, 110.0, 110.0);
        assert_eq!(
            select_candidate(&PlayerFrame::new(), &ball, &PossessionConfig::default()),
            None
        );
    }
}
