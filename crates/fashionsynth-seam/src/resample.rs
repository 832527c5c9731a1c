//! Resampling of traced curves into stitch points.

use fashionsynth_math::{Point3, Tolerance};

use crate::edge::BoundaryEdge;

/// Distance under which two path vertices are merged.
pub const MATCH_TOLERANCE: Tolerance = Tolerance::DEFAULT;

/// Linear interpolation between two points.
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Parameter of stitch `i` out of `n`, evenly spread over `[0, 1]`.
///
/// A single stitch sits at the middle.
pub fn spread(i: usize, n: usize) -> f64 {
    if n > 1 {
        i as f64 / (n - 1) as f64
    } else {
        0.5
    }
}

/// Number of stitches for `length` at `spacing`, never below `min`.
pub fn stitch_count(length: f64, spacing: f64, min: usize) -> usize {
    let n = if spacing > 0.0 {
        (length / spacing).floor().max(0.0) as usize
    } else {
        0
    };
    n.max(min)
}

/// `n` evenly spaced points from `a` to `b`.
pub fn lerp_points(a: &Point3, b: &Point3, n: usize) -> Vec<Point3> {
    (0..n).map(|i| lerp(a, b, spread(i, n))).collect()
}

/// Drop points that lie within [`MATCH_TOLERANCE`] of an earlier one.
pub fn dedup_points(points: impl IntoIterator<Item = Point3>) -> Vec<Point3> {
    let mut out: Vec<Point3> = Vec::new();
    for p in points {
        if !out.iter().any(|q| MATCH_TOLERANCE.points_equal(q, &p)) {
            out.push(p);
        }
    }
    out
}

/// Unique endpoints of a set of edges, sorted by Y.
pub fn edge_vertices_by_y<'a>(edges: impl IntoIterator<Item = &'a BoundaryEdge>) -> Vec<Point3> {
    let mut points = dedup_points(edges.into_iter().flat_map(|e| [e.v1, e.v2]));
    points.sort_by(|a, b| a.y.total_cmp(&b.y));
    points
}

/// Total length of a polyline.
pub fn path_length(path: &[Point3]) -> f64 {
    path.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Point at fraction `t` of the arc length of `path`.
///
/// Returns `None` for an empty path and the only point of a
/// single-point path.
pub fn point_at_fraction(path: &[Point3], t: f64) -> Option<Point3> {
    let first = *path.first()?;
    if path.len() == 1 {
        return Some(first);
    }
    let target = t * path_length(path);
    let mut walked = 0.0;
    for w in path.windows(2) {
        let seg = (w[1] - w[0]).norm();
        if walked + seg >= target {
            let local = if seg > 0.0 { (target - walked) / seg } else { 0.0 };
            return Some(lerp(&w[0], &w[1], local));
        }
        walked += seg;
    }
    Some(first)
}

/// `n` points at Y positions evenly spread across the edges' Y range.
///
/// Edges are scanned in order of their lower Y. Each target Y is
/// interpolated on the first edge whose Y range contains it; when none
/// does, the endpoint closest in Y is used.
pub fn interpolate_along_y(edges: &[BoundaryEdge], n: usize) -> Vec<Point3> {
    if edges.is_empty() {
        return Vec::new();
    }
    let mut sorted = edges.to_vec();
    sorted.sort_by(|a, b| a.v1.y.min(a.v2.y).total_cmp(&b.v1.y.min(b.v2.y)));

    let y_min = sorted
        .iter()
        .map(|e| e.v1.y.min(e.v2.y))
        .fold(f64::INFINITY, f64::min);
    let y_max = sorted
        .iter()
        .map(|e| e.v1.y.max(e.v2.y))
        .fold(f64::NEG_INFINITY, f64::max);

    (0..n)
        .map(|i| {
            let target = if n == 1 {
                (y_min + y_max) / 2.0
            } else {
                y_min + spread(i, n) * (y_max - y_min)
            };
            on_edge_at_y(&sorted, target).unwrap_or_else(|| closest_endpoint_in_y(&sorted, target))
        })
        .collect()
}

fn on_edge_at_y(edges: &[BoundaryEdge], target: f64) -> Option<Point3> {
    edges.iter().find_map(|e| {
        let (lo, hi) = (e.v1.y.min(e.v2.y), e.v1.y.max(e.v2.y));
        if !(lo..=hi).contains(&target) {
            return None;
        }
        let dy = e.v2.y - e.v1.y;
        if !MATCH_TOLERANCE.is_zero(dy) {
            let t = ((target - e.v1.y) / dy).clamp(0.0, 1.0);
            Some(lerp(&e.v1, &e.v2, t))
        } else {
            None
        }
    })
}

fn closest_endpoint_in_y(edges: &[BoundaryEdge], target: f64) -> Point3 {
    let mut best = edges[0].v1;
    let mut best_d = f64::INFINITY;
    for e in edges {
        for v in [e.v1, e.v2] {
            let d = (v.y - target).abs();
            if d < best_d {
                best_d = d;
                best = v;
            }
        }
    }
    best
}

/// Point on `path` at height `z`, interpolated on the first segment
/// spanning it.
pub fn sample_path_at_z(path: &[Point3], z: f64) -> Option<Point3> {
    for w in path.windows(2) {
        let (z1, z2) = (w[0].z, w[1].z);
        if (z1 <= z && z <= z2) || (z2 <= z && z <= z1) {
            if !MATCH_TOLERANCE.is_zero(z2 - z1) {
                return Some(lerp(&w[0], &w[1], (z - z1) / (z2 - z1)));
            }
            return Some(w[0]);
        }
    }
    None
}

/// Path vertex closest in Z to `z`.
pub fn closest_in_z(path: &[Point3], z: f64) -> Option<Point3> {
    path.iter()
        .copied()
        .min_by(|a, b| (a.z - z).abs().total_cmp(&(b.z - z).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: (f64, f64, f64), b: (f64, f64, f64)) -> BoundaryEdge {
        BoundaryEdge {
            a: 0,
            b: 1,
            v1: Point3::new(a.0, a.1, a.2),
            v2: Point3::new(b.0, b.1, b.2),
        }
    }

    #[test]
    fn test_stitch_count_floor_and_min() {
        assert_eq!(stitch_count(1.0, 0.05, 3), 20);
        assert_eq!(stitch_count(0.1, 0.05, 3), 3);
        assert_eq!(stitch_count(0.33, 0.05, 5), 6);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let pts = dedup_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0005, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], Point3::origin());
    }

    #[test]
    fn test_point_at_fraction_by_arc_length() {
        let path = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 3.0),
        ];
        let p = point_at_fraction(&path, 0.5).unwrap();
        assert!((p - Point3::new(0.0, 1.0, 1.0)).norm() < 1e-12);
        let end = point_at_fraction(&path, 1.0).unwrap();
        assert!((end - path[2]).norm() < 1e-12);
        assert!(point_at_fraction(&[], 0.5).is_none());
    }

    #[test]
    fn test_interpolate_along_y_spans_range() {
        let edges = [
            edge((0.0, 1.0, 0.0), (0.0, 2.0, 0.5)),
            edge((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
        ];
        let pts = interpolate_along_y(&edges, 5);
        assert_eq!(pts.len(), 5);
        assert!((pts[0].y - 0.0).abs() < 1e-12);
        assert!((pts[4].y - 2.0).abs() < 1e-12);
        assert!((pts[3].z - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_falls_back_to_endpoint() {
        // Degenerate in Y: every target snaps to the nearest endpoint.
        let edges = [edge((0.0, 0.5, 0.0), (0.0, 0.5, 1.0))];
        let pts = interpolate_along_y(&edges, 3);
        assert!(pts.iter().all(|p| (p.y - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_sample_path_at_z() {
        let path = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 2.0, 1.0)];
        let p = sample_path_at_z(&path, 0.5).unwrap();
        assert!((p.y - 1.0).abs() < 1e-12);
        assert!(sample_path_at_z(&path, 2.0).is_none());
        assert_eq!(closest_in_z(&path, 2.0), Some(path[1]));
    }

    #[test]
    fn test_sample_flat_segment_returns_start() {
        let z = MATCH_TOLERANCE.linear / 2.0;
        let path = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 2.0, z)];
        assert_eq!(sample_path_at_z(&path, z / 2.0), Some(path[0]));
    }
}
