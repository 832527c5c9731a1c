//! Front and back panel features: side seams, shoulders and necklines.

use std::collections::HashSet;

use fashionsynth_math::Point3;

use crate::connector::{align_endpoints, SeamConnector, SeamKind};
use crate::edge::{first_max_by, first_min_by, BoundaryEdge, WorldMesh};
use crate::error::{Result, SeamError};
use crate::resample::{
    closest_in_z, lerp_points, sample_path_at_z, spread, stitch_count, MATCH_TOLERANCE,
};

/// Edges within this angle of vertical count as side edges (degrees).
pub const SIDE_VERTICAL_ANGLE: f64 = 30.0;
/// A side climb stops at an edge turned further than this (degrees).
pub const SIDE_STOP_ANGLE: f64 = 35.0;
/// Fraction of the half width, from the center, beyond which an edge
/// lies on a side.
pub const SIDE_BAND: f64 = 0.3;
/// Z distance joining consecutive side edges.
pub const SIDE_JOIN_Z: f64 = 0.1;
/// Shoulder edges slope between these angles from horizontal (degrees).
pub const SHOULDER_ANGLES: (f64, f64) = (15.0, 45.0);
/// Depth below the top searched for shoulder edges.
pub const SHOULDER_DEPTH: f64 = 0.15;

/// Left or right side of a panel, by sign of Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Negative Y.
    Left,
    /// Positive Y.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Which panel a neckline is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFace {
    /// Front panel, with a deeper neck.
    Front,
    /// Back panel.
    Back,
}

impl PanelFace {
    /// Depth below the panel top searched for neckline edges.
    pub fn neck_depth(self) -> f64 {
        match self {
            PanelFace::Front => 0.40,
            PanelFace::Back => 0.15,
        }
    }
}

/// Neckline edges of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Neckline {
    /// Panel name.
    pub piece: String,
    /// Panel face.
    pub face: PanelFace,
    /// Neckline edges, ordered by Y for the shoulder-bounded case.
    pub edges: Vec<BoundaryEdge>,
}

/// Which side of a panel an edge lies on.
fn on_side(panel: &WorldMesh, edge: &BoundaryEdge, side: Side) -> bool {
    let (min_y, max_y) = (panel.bounds.min.y, panel.bounds.max.y);
    let center = (min_y + max_y) / 2.0;
    match side {
        Side::Right => edge.avg_y() > center + (max_y - center) * SIDE_BAND,
        Side::Left => edge.avg_y() < center + (min_y - center) * SIDE_BAND,
    }
}

/// Near-vertical edges making up one side of a panel, in climb order.
///
/// The climb starts at the longest side edge and repeatedly takes the
/// first edge, in mesh order, with an endpoint at the current top
/// height. A steep same-side edge continues the side; an edge turned
/// past [`SIDE_STOP_ANGLE`] ends it.
pub fn find_side_edges(panel: &WorldMesh, side: Side) -> Result<Vec<BoundaryEdge>> {
    let steep = |e: &BoundaryEdge| e.length() > 0.0 && e.angle_from_vertical() < SIDE_VERTICAL_ANGLE;
    let main = first_max_by(
        panel
            .edges
            .iter()
            .enumerate()
            .filter(|&(_, e)| steep(e) && on_side(panel, e, side)),
        |(_, e)| e.length(),
    )
    .ok_or_else(|| SeamError::not_found("side edge", &panel.name))?;

    let mut processed = HashSet::from([main.0]);
    let mut chain = vec![*main.1];
    let mut top = main.1.upper().z;

    'climb: loop {
        for (i, e) in panel.edges.iter().enumerate() {
            if processed.contains(&i) || e.length() <= 0.0 {
                continue;
            }
            if (e.v1.z - top).abs() >= SIDE_JOIN_Z && (e.v2.z - top).abs() >= SIDE_JOIN_Z {
                continue;
            }
            if e.angle_from_vertical() > SIDE_STOP_ANGLE {
                break 'climb;
            }
            if steep(e) && on_side(panel, e, side) {
                processed.insert(i);
                chain.push(*e);
                top = e.v1.z.max(e.v2.z);
                continue 'climb;
            }
        }
        break;
    }
    Ok(chain)
}

/// Lower vertex of each edge plus the top of the last, edges ordered by Z.
fn side_path(edges: &[BoundaryEdge]) -> Vec<Point3> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|a, b| a.avg_z().total_cmp(&b.avg_z()));
    let mut path: Vec<Point3> = sorted.iter().map(BoundaryEdge::lower).collect();
    if let Some(last) = sorted.last() {
        path.push(last.upper());
    }
    path
}

/// Side seam between the front and back panel on one side.
///
/// Both sides are traced, truncated to the shorter edge count and
/// sampled at common heights spread over their joint Z range.
pub fn panel_side_seam(
    front: &WorldMesh,
    back: &WorldMesh,
    side: Side,
    spacing: f64,
) -> Result<SeamConnector> {
    let mut front_edges = find_side_edges(front, side)?;
    let mut back_edges = find_side_edges(back, side)?;
    let n_edges = front_edges.len().min(back_edges.len());
    front_edges.truncate(n_edges);
    back_edges.truncate(n_edges);

    let front_path = side_path(&front_edges);
    let back_path = side_path(&back_edges);

    let (lo, hi) = front_path
        .iter()
        .chain(&back_path)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)));
    let range = hi - lo;
    let n = stitch_count(range, spacing, 3);

    let at = |path: &[Point3], z: f64| sample_path_at_z(path, z).or_else(|| closest_in_z(path, z));
    let mut pairs = Vec::with_capacity(n);
    for i in 0..n {
        let z = lo + spread(i, n) * range;
        if let (Some(a), Some(b)) = (at(&front_path, z), at(&back_path, z)) {
            pairs.push((a, b));
        }
    }

    Ok(SeamConnector::from_pairs(
        SeamKind::PanelSide,
        format!("side_seam_{}", side.as_str()),
        &[&front.name, &back.name],
        pairs,
    ))
}

fn top_edges(panel: &WorldMesh, depth: f64) -> Vec<BoundaryEdge> {
    let floor = panel.bounds.max.z - depth;
    panel
        .edges
        .iter()
        .filter(|e| e.length() > 0.0 && e.avg_z() > floor)
        .copied()
        .collect()
}

fn is_shoulder(e: &BoundaryEdge) -> bool {
    let angle = e.angle_from_horizontal();
    SHOULDER_ANGLES.0 < angle && angle < SHOULDER_ANGLES.1
}

/// Outermost sloped edge at the top on each side, `(left, right)`.
fn shoulder_pair(panel: &WorldMesh, edges: &[BoundaryEdge]) -> Result<(BoundaryEdge, BoundaryEdge)> {
    let sloped: Vec<&BoundaryEdge> = edges.iter().filter(|e| is_shoulder(e)).collect();
    if sloped.len() < 2 {
        return Err(SeamError::not_found("shoulder edges", &panel.name));
    }
    let left = first_min_by(sloped.iter().copied(), |e| e.avg_y());
    let right = first_max_by(sloped.iter().copied(), |e| e.avg_y());
    match (left, right) {
        (Some(l), Some(r)) => Ok((*l, *r)),
        _ => Err(SeamError::not_found("shoulder edges", &panel.name)),
    }
}

/// Left and right shoulder edges of a panel.
pub fn find_shoulders(panel: &WorldMesh) -> Result<(BoundaryEdge, BoundaryEdge)> {
    let top = top_edges(panel, SHOULDER_DEPTH);
    shoulder_pair(panel, &top)
}

/// Shoulder seams, left then right.
///
/// Both are skipped when either panel lacks two shoulder edges.
pub fn shoulder_seams(front: &WorldMesh, back: &WorldMesh, spacing: f64) -> Result<Vec<SeamConnector>> {
    let (front_l, front_r) = find_shoulders(front)?;
    let (back_l, back_r) = find_shoulders(back)?;

    let seams = [(Side::Left, front_l, back_l), (Side::Right, front_r, back_r)]
        .into_iter()
        .map(|(side, f, b)| {
            let f_pts = f.by_y();
            let b_pts = align_endpoints(f_pts, b.by_y());
            let n = stitch_count(f.length().min(b.length()), spacing, 3);
            SeamConnector::new(
                SeamKind::Shoulder,
                format!("shoulder_seam_{}", side.as_str()),
                &[&front.name, &back.name],
                lerp_points(&f_pts.0, &f_pts.1, n),
                lerp_points(&b_pts.0, &b_pts.1, n),
            )
        })
        .collect();
    Ok(seams)
}

fn same_edge(a: &BoundaryEdge, b: &BoundaryEdge) -> bool {
    MATCH_TOLERANCE.points_equal(&a.v1, &b.v1) && MATCH_TOLERANCE.points_equal(&a.v2, &b.v2)
}

/// Neckline edges of a panel.
///
/// The neckline lies between the two shoulders. When nothing lies
/// between them the front takes every sloped top edge; the back takes
/// the steep edges near its center.
pub fn find_neckline(panel: &WorldMesh, face: PanelFace) -> Result<Neckline> {
    let mut top = top_edges(panel, face.neck_depth());
    top.sort_by(|a, b| a.avg_y().total_cmp(&b.avg_y()));

    let (left, right) = shoulder_pair(panel, &top)?;
    let (lo, hi) = (left.avg_y(), right.avg_y());

    let mut edges: Vec<BoundaryEdge> = top
        .iter()
        .filter(|e| lo < e.avg_y() && e.avg_y() < hi)
        .copied()
        .collect();

    if !edges.is_empty() {
        if face == PanelFace::Front && edges.len() < 5 {
            for e in &top {
                let inside = lo - 0.1 <= e.avg_y() && e.avg_y() <= hi + 0.1;
                if inside && e.angle_from_horizontal() > 5.0 && !edges.iter().any(|n| same_edge(n, e)) {
                    edges.push(*e);
                }
            }
        }
    } else if face == PanelFace::Front {
        edges = top
            .iter()
            .filter(|e| e.angle_from_horizontal() > 5.0)
            .copied()
            .collect();
    } else {
        let steep: Vec<BoundaryEdge> = top
            .iter()
            .filter(|e| e.angle_from_horizontal() > 45.0)
            .copied()
            .collect();
        if !steep.is_empty() {
            let mean = steep.iter().map(BoundaryEdge::avg_y).sum::<f64>() / steep.len() as f64;
            edges = steep
                .into_iter()
                .filter(|e| (e.avg_y() - mean).abs() < 0.3)
                .collect();
        }
    }

    if edges.is_empty() {
        return Err(SeamError::not_found("neckline", &panel.name));
    }
    log::debug!("{}: {} neckline edges", panel.name, edges.len());
    Ok(Neckline {
        piece: panel.name.clone(),
        face,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::tests::yz_mesh;

    /// Bodice outline in (y, z): straight sides, sloped shoulders and a
    /// shallow neck dip between them.
    fn bodice(name: &str, neck_z: f64) -> WorldMesh {
        yz_mesh(
            name,
            &[
                (-1.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.2),
                (1.0, 2.1),
                (0.5, 2.3),
                (0.2, neck_z),
                (-0.2, neck_z),
                (-0.5, 2.3),
                (-1.0, 2.1),
                (-1.0, 1.2),
            ],
        )
    }

    #[test]
    fn test_side_climb_joins_stacked_edges() {
        let p = bodice("front", 2.2);
        let right = find_side_edges(&p, Side::Right).unwrap();
        assert_eq!(right.len(), 2);
        assert!(right.iter().all(|e| e.avg_y() > 0.9));
        let left = find_side_edges(&p, Side::Left).unwrap();
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_side_seam_spans_full_height() {
        let front = bodice("front", 2.2);
        let back = bodice("back", 2.25);
        let seam = panel_side_seam(&front, &back, Side::Right, 0.1).unwrap();
        assert!(seam.len() >= 20);
        let (first, last) = (seam.pairs[0], seam.pairs[seam.len() - 1]);
        assert!(first.0.z.abs() < 1e-9);
        assert!((last.1.z - 2.1).abs() < 1e-9);
        assert!(seam.pairs.iter().all(|(a, b)| (a - b).norm() < 1e-9));
    }

    #[test]
    fn test_shoulders_are_outermost_slopes() {
        let p = bodice("front", 2.2);
        let (left, right) = find_shoulders(&p).unwrap();
        assert!((left.avg_y() + 0.75).abs() < 1e-9);
        assert!((right.avg_y() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_shoulder_seams_align_endpoints() {
        let front = bodice("front", 2.2);
        let back = bodice("back", 2.25);
        let seams = shoulder_seams(&front, &back, 0.05).unwrap();
        assert_eq!(seams.len(), 2);
        assert_eq!(seams[0].name, "shoulder_seam_left");
        for s in &seams {
            assert!(s.len() >= 3);
            assert!(s.pairs.iter().all(|(a, b)| (a - b).norm() < 1e-9));
        }
    }

    #[test]
    fn test_neckline_between_shoulders() {
        let p = bodice("front", 2.2);
        let neck = find_neckline(&p, PanelFace::Back).unwrap();
        assert_eq!(neck.edges.len(), 3);
        assert!(neck.edges.iter().all(|e| e.avg_y().abs() < 0.5));

        // A shallow front neckline also picks up the shoulder slopes.
        let front = find_neckline(&p, PanelFace::Front).unwrap();
        assert_eq!(front.edges.len(), 5);
    }

    #[test]
    fn test_back_neckline_centers_on_steep_edges() {
        // Shoulders meet at a peak, so nothing lies between them. The
        // steep neck edges sit off to the right among flat top edges.
        let p = yz_mesh(
            "back",
            &[
                (-1.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.9),
                (1.0, 2.0),
                (0.9, 2.0),
                (0.9, 1.9),
                (0.1, 1.9),
                (0.0, 1.95),
                (-0.1, 1.9),
                (-1.0, 1.9),
            ],
        );
        let neck = find_neckline(&p, PanelFace::Back).unwrap();
        assert_eq!(neck.edges.len(), 2);
        assert!(neck.edges.iter().all(|e| e.angle_from_horizontal() > 45.0));
        assert!(neck.edges.iter().all(|e| e.avg_y() > 0.85));
    }

    #[test]
    fn test_same_edge_within_match_tolerance() {
        let e = BoundaryEdge {
            a: 0,
            b: 1,
            v1: Point3::new(0.0, 0.0, 0.0),
            v2: Point3::new(0.0, 1.0, 0.0),
        };
        let close = BoundaryEdge {
            v2: Point3::new(0.0, 1.0, MATCH_TOLERANCE.linear / 2.0),
            ..e
        };
        let far = BoundaryEdge {
            v2: Point3::new(0.0, 1.0, MATCH_TOLERANCE.linear * 2.0),
            ..e
        };
        assert!(same_edge(&e, &close));
        assert!(!same_edge(&e, &far));
    }

    #[test]
    fn test_flat_top_has_no_shoulders() {
        let p = yz_mesh("front", &[(-1.0, 0.0), (1.0, 0.0), (1.0, 2.0), (-1.0, 2.0)]);
        assert!(find_shoulders(&p).is_err());
        assert!(find_neckline(&p, PanelFace::Front).is_err());
    }
}
