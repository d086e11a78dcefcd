//! Planar coordinate type and spatial utilities.
//!
//! Coordinates are projected metres (the island mask is in a metric grid), so
//! distances are plain Euclidean.  Bearings follow the compass convention used
//! throughout the movement model: 0 points along +y (north) and angles grow
//! clockwise towards +x (east), so a step of length `l` along bearing `θ` is
//! `(sin θ · l, cos θ · l)`.

/// A projected (x, y) position in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Compass bearing (radians, in `(-π, π]`) from `self` towards `target`.
    ///
    /// Coincident points yield a bearing of 0.
    #[inline]
    pub fn bearing_to(self, target: Point) -> f64 {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        dx.atan2(dy)
    }

    /// The point reached by walking `length` metres along compass `bearing`.
    #[inline]
    pub fn step(self, bearing: f64, length: f64) -> Point {
        Point {
            x: self.x + bearing.sin() * length,
            y: self.y + bearing.cos() * length,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
