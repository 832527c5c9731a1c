//! Discrete orientation search.
//!
//! Candidate rotations are scored on a local copy of the vertices; only
//! the winner is written back to the piece.

use std::f64::consts::{FRAC_PI_2, PI};

use fashionsynth_math::{Aabb3, Point3, Transform, Vec3};
use fashionsynth_pattern::{edge_key, PieceMesh};

/// Rotation angles tried on each axis.
pub const QUARTER_TURNS: [f64; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

/// Largest X span a cuff may keep and still score.
pub const CUFF_MAX_THICKNESS: f64 = 0.1;

/// Per-axis delta below which an edge counts as lying on an axis.
pub const AXIS_TOLERANCE: f64 = 0.001;

/// Bounding-box spans of `vertices` rotated by XYZ Euler angles.
pub fn rotated_spans(vertices: &[Point3], rotation: &Vec3) -> Option<Vec3> {
    let m = Transform::euler_xyz(rotation);
    let rotated: Vec<Point3> = vertices.iter().map(|v| m.apply_point(v)).collect();
    Aabb3::from_points(&rotated).map(|b| b.span())
}

/// Try all 64 quarter-turn combinations and return the best-scoring
/// rotation with its score.
///
/// Axes are iterated X outermost. A candidate has to beat the best so
/// far strictly, so ties keep the earlier combination.
pub fn search_orientation<F>(vertices: &[Point3], score: F) -> Option<(Vec3, f64)>
where
    F: Fn(&Vec3) -> f64,
{
    let mut best: Option<(Vec3, f64)> = None;
    let mut best_score = -1.0;
    for &rx in &QUARTER_TURNS {
        for &ry in &QUARTER_TURNS {
            for &rz in &QUARTER_TURNS {
                let rotation = Vec3::new(rx, ry, rz);
                let spans = rotated_spans(vertices, &rotation)?;
                let s = score(&spans);
                if s > best_score {
                    best_score = s;
                    best = Some((rotation, s));
                }
            }
        }
    }
    best
}

/// Hood halves stand upright and face sideways: thin in Y, tall in Z.
pub fn hood_score(spans: &Vec3) -> f64 {
    if spans.y > 0.01 && spans.z > 0.01 && spans.y < spans.z {
        1000.0 / spans.y
    } else {
        0.0
    }
}

/// Cuffs lie flat in YZ, ideally tallest in Z and narrowest in Y.
pub fn cuff_score(spans: &Vec3) -> f64 {
    if spans.x > CUFF_MAX_THICKNESS {
        return 0.0;
    }
    let max = spans.x.max(spans.y).max(spans.z);
    let min = spans.x.min(spans.y).min(spans.z);
    let z_longest = spans.z == max;
    let y_shortest = spans.y == min;
    match (z_longest, y_shortest) {
        (true, true) => 1000.0 + spans.z,
        (true, false) => 500.0 + spans.z - spans.y * 10.0,
        (false, true) => 300.0 + spans.z - (spans.z - max).abs() * 10.0,
        (false, false) => 100.0 + spans.z,
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

fn aligned_axis(d: &Vec3) -> Option<Axis> {
    let moving: Vec<Axis> = [(d.x, Axis::X), (d.y, Axis::Y), (d.z, Axis::Z)]
        .into_iter()
        .filter(|(c, _)| c.abs() > AXIS_TOLERANCE)
        .map(|(_, axis)| axis)
        .collect();
    match moving.as_slice() {
        [axis] => Some(*axis),
        _ => None,
    }
}

/// A boundary edge lying along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedEdge {
    /// Vertex indices.
    pub edge: [usize; 2],
    /// Axis the edge lies on.
    pub axis: Axis,
    /// Edge length.
    pub length: f64,
    /// Edge midpoint.
    pub midpoint: Point3,
}

/// Longest boundary edge of `mesh` that is parallel to a single axis,
/// measured with the mesh's rotation applied.
pub fn longest_aligned_edge(mesh: &PieceMesh) -> Option<AlignedEdge> {
    let m = Transform::euler_xyz(&mesh.rotation);
    let counts = mesh.edge_face_counts();
    let mut best: Option<AlignedEdge> = None;
    for &[a, b] in &mesh.edges {
        if counts.get(&edge_key(a, b)) != Some(&1) {
            continue;
        }
        let (p, q) = (m.apply_point(&mesh.vertices[a]), m.apply_point(&mesh.vertices[b]));
        let d = q - p;
        let Some(axis) = aligned_axis(&d) else {
            continue;
        };
        let length = d.norm();
        if best.map_or(true, |e| length > e.length) {
            best = Some(AlignedEdge {
                edge: [a, b],
                axis,
                length,
                midpoint: Point3::from((p.coords + q.coords) / 2.0),
            });
        }
    }
    best
}

/// Turn a panel so its longest straight edge runs along Y, then flip it
/// if that edge ends up above the origin.
///
/// Returns the axis the edge lay on before turning, or `None` when the
/// mesh has no axis-aligned boundary edge and was left untouched.
pub fn orient_panel_by_edge(mesh: &mut PieceMesh) -> Option<Axis> {
    let Some(edge) = longest_aligned_edge(mesh) else {
        log::warn!("no straight boundary edge, panel left as is");
        return None;
    };
    match edge.axis {
        Axis::X => mesh.rotation.z += FRAC_PI_2,
        Axis::Z => mesh.rotation.x += FRAC_PI_2,
        Axis::Y => {}
    }

    let m = Transform::euler_xyz(&mesh.rotation);
    let [a, b] = edge.edge;
    let mid_z = (m.apply_point(&mesh.vertices[a]).z + m.apply_point(&mesh.vertices[b]).z) / 2.0;
    if mid_z > 0.0 {
        mesh.rotation.x += PI;
    }
    log::debug!("longest straight edge on {:?}, length {:.3}", edge.axis, edge.length);
    Some(edge.axis)
}
