//! R-tree entry shared by the lure and trap indices.

use rstar::{PointDistance, RTreeObject, AABB};

use stoat_core::Point;

/// A 2-D `[x, y]` point tagged with its position in the owning `Vec`.
#[derive(Clone, Debug)]
pub(crate) struct IndexedPoint {
    pub point: [f64; 2],
    pub index: u32,
}

impl IndexedPoint {
    pub fn new(p: Point, index: usize) -> Self {
        Self { point: [p.x, p.y], index: index as u32 }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
