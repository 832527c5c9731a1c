//! Axis-aligned bounding boxes over scene-space vertices.
//!
//! Every positioning rule and seam finder reads spans and extremes from
//! these boxes rather than from raw vertex lists.

use serde::{Deserialize, Serialize};

use crate::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Bounding box of a point set, `None` when the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        if aabb.is_empty() {
            None
        } else {
            Some(aabb)
        }
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Extent along each axis.
    pub fn span(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = [
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let bb = Aabb3::from_points(&pts).unwrap();
        let span = bb.span();
        assert!((span.x - 4.0).abs() < 1e-12);
        assert!((span.y - 3.0).abs() < 1e-12);
        assert!((span.z - 2.0).abs() < 1e-12);
        let c = bb.center();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y + 0.5).abs() < 1e-12);
        assert!((c.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set_has_no_box() {
        let pts: [Point3; 0] = [];
        assert!(Aabb3::from_points(&pts).is_none());
        assert!(Aabb3::empty().is_empty());
    }
}
