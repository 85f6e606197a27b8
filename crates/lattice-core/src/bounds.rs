use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::grid::SpatialPoint;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: SpatialPoint,
    pub max: SpatialPoint,
}

impl BoundingBox {
    pub fn new(min: SpatialPoint, max: SpatialPoint) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SpatialPoint>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bb = Self::new(first, first);
        for p in iter {
            bb.expand_to_include(p);
        }
        Some(bb)
    }

    pub fn expand_to_include(&mut self, p: &SpatialPoint) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    /// True when at least one axis has zero length.
    pub fn is_degenerate(&self) -> bool {
        let e = self.extent();
        e.x == 0.0 || e.y == 0.0 || e.z == 0.0
    }

    pub fn contains_point(&self, p: &SpatialPoint) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self::new(self.min + *offset, self.max + *offset)
    }

    pub fn center(&self) -> SpatialPoint {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}
