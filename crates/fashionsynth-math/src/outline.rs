//! Closed 2D outlines in pattern (SVG) coordinates.

use serde::{Deserialize, Serialize};

use crate::Point2;

/// A closed polyline outline of a flat pattern piece.
///
/// Point order defines the boundary and its winding; the closing edge
/// from the last point back to the first is implicit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Vertices of the outline in order.
    pub points: Vec<Point2>,
}

impl Outline {
    /// Create an outline from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` sequence.
    ///
    /// A trailing unpaired value is dropped.
    pub fn from_flat(coords: &[f64]) -> Self {
        let points = coords
            .chunks_exact(2)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();
        Self { points }
    }

    /// Flatten back into `[x0, y0, x1, y1, ...]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Minimum and maximum corners, `None` for an empty outline.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    /// Horizontal (X) extent.
    pub fn width(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| max.x - min.x)
    }

    /// Vertical (Y) extent.
    pub fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| max.y - min.y)
    }

    /// Center of the bounding box.
    pub fn bounds_center(&self) -> Point2 {
        self.bounds()
            .map_or(Point2::origin(), |(min, max)| nalgebra::center(&min, &max))
    }

    /// Largest absolute value among all coordinates.
    pub fn max_abs_coord(&self) -> f64 {
        self.points
            .iter()
            .fold(0.0_f64, |acc, p| acc.max(p.x.abs()).max(p.y.abs()))
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / n, sy / n)
    }

    /// Rotate every point by `angle` radians about `center`.
    pub fn rotated_about(&self, center: &Point2, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let points = self
            .points
            .iter()
            .map(|p| {
                let d = p - center;
                Point2::new(center.x + d.x * c - d.y * s, center.y + d.x * s + d.y * c)
            })
            .collect();
        Self { points }
    }

    /// Rotate by a whole number of degrees about the vertex centroid.
    ///
    /// Zero degrees returns an unchanged copy.
    pub fn rotated_about_centroid(&self, degrees: f64) -> Self {
        if degrees == 0.0 || self.points.is_empty() {
            return self.clone();
        }
        self.rotated_about(&self.centroid(), degrees.to_radians())
    }
}
