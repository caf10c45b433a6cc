//! Geometry primitives
//!
//! Axis-aligned boxes and points in image pixel space (or tactical space for
//! [`Point`]). Everything here is a pure function; degenerate input never
//! panics and never errors.

use serde::{Deserialize, Serialize};

/// 2D point.
///
/// Serialized as `[x, y]`, the layout upstream tools emit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f32 {
        distance(*self, *other)
    }

    /// Linear blend: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Clamp into `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> Point {
        Point::new(self.x.clamp(0.0, width), self.y.clamp(0.0, height))
    }
}

impl From<[f32; 2]> for Point {
    fn from(v: [f32; 2]) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned bounding box `(x1, y1)`-`(x2, y2)`.
///
/// Serialized as `[x1, y1, x2, y2]`. Well-formed boxes have `x2 >= x1` and
/// `y2 >= y1`; inverted boxes are tolerated and simply have zero area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Area, 0 for inverted or flat boxes.
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// True when the box encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    /// Coordinate-wise linear interpolation toward `other`.
    pub fn lerp(&self, other: &BBox, t: f32) -> BBox {
        BBox::new(
            self.x1 + (other.x1 - self.x1) * t,
            self.y1 + (other.y1 - self.y1) * t,
            self.x2 + (other.x2 - self.x2) * t,
            self.y2 + (other.y2 - self.y2) * t,
        )
    }

    /// Overlap area with `other` (0 when disjoint).
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }
        (x2 - x1) * (y2 - y1)
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Fraction of the ball box covered by the player box.
///
/// Returns 0.0 for a degenerate ball box (zero area or inverted corners)
/// and for disjoint boxes.
pub fn containment_ratio(player: &BBox, ball: &BBox) -> f32 {
    let ball_area = ball.area();
    if ball_area <= 0.0 {
        return 0.0;
    }
    player.intersection_area(ball) / ball_area
}
