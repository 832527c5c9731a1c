//! Sleeve seams: the sleeve closed into a tube, and the sleeve sides
//! to the panel armholes.

use std::collections::HashSet;

use fashionsynth_math::Point3;

use crate::connector::{align_sequences, SeamConnector, SeamKind};
use crate::edge::{first_max_by, first_min_by, line_angle, BoundaryEdge, WorldMesh};
use crate::error::{Result, SeamError};
use crate::panel::Side;
use crate::resample::interpolate_along_y;
use crate::trace::{trace_smooth, TraceOptions, TurnMeasure};

/// Stitches along each side of the tube closure.
pub const TUBE_STITCHES: usize = 10;
/// Fallback band around the lowest and highest edge heights.
pub const TUBE_FALLBACK_BAND: f64 = 0.2;
/// Turn above which tracing a sleeve side stops (degrees).
pub const SIDE_STOP_ANGLE: f64 = 60.0;
/// Minimum stitches per sleeve-to-panel connector.
pub const ARMHOLE_MIN_STITCHES: usize = 8;
/// Turn from the side seam line that marks the armhole start (degrees).
pub const ARMHOLE_START_ANGLE: f64 = 35.0;
/// Turn that ends the armhole curve (degrees).
pub const ARMHOLE_END_ANGLE: f64 = 60.0;
/// Step limit for each armhole walk.
pub const ARMHOLE_MAX_STEPS: usize = 50;

/// Tube closure joining a sleeve's upper horizontal edges to its lower ones.
pub fn sleeve_horizontal_seam(sleeve: &WorldMesh) -> Result<SeamConnector> {
    let mut edges: Vec<BoundaryEdge> = sleeve
        .edges
        .iter()
        .filter(|e| {
            let d = e.vector();
            d.y.abs() > 0.1 && d.y.abs() > 0.7 * d.z.abs() && d.y.abs() > d.x.abs()
        })
        .copied()
        .collect();
    if edges.len() < 2 {
        return Err(SeamError::not_found("horizontal edges", &sleeve.name));
    }
    edges.sort_by(|a, b| a.avg_z().total_cmp(&b.avg_z()));

    let (lowest, highest) = (edges[0].avg_z(), edges[edges.len() - 1].avg_z());
    let mid = (lowest + highest) / 2.0;
    let (mut top, mut bottom): (Vec<BoundaryEdge>, Vec<BoundaryEdge>) =
        edges.iter().partition(|e| e.avg_z() >= mid);

    if top.is_empty() || bottom.is_empty() {
        let band = |z: f64| -> Vec<BoundaryEdge> {
            edges
                .iter()
                .filter(|e| (e.avg_z() - z).abs() < TUBE_FALLBACK_BAND)
                .copied()
                .collect()
        };
        top = band(highest);
        bottom = band(lowest);
    }
    if top.is_empty() || bottom.is_empty() {
        return Err(SeamError::not_found("tube edges", &sleeve.name));
    }

    Ok(SeamConnector::new(
        SeamKind::SleeveHorizontal,
        format!("seam_{}_tube", sleeve.name),
        &[&sleeve.name],
        interpolate_along_y(&top, TUBE_STITCHES),
        interpolate_along_y(&bottom, TUBE_STITCHES),
    ))
}

/// Trace the sleeve side that meets the panels.
///
/// Starts at the lowest Z-dominant edge nearest Y = 0 and climbs
/// through edges rising less than 0.1 per step. Returns the traced
/// edges and the side of the body the sleeve is on.
pub fn find_sleeve_side(sleeve: &WorldMesh) -> Result<(Vec<BoundaryEdge>, Side)> {
    let valid: Vec<(usize, &BoundaryEdge)> = sleeve
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            let d = e.vector();
            d.z.abs() > d.y.abs() && d.z.abs() > 0.02 && d.z.abs() > d.x.abs()
        })
        .collect();
    let lowest = valid
        .iter()
        .map(|(_, e)| e.min_z())
        .fold(f64::INFINITY, f64::min);
    let (start, _) = first_min_by(
        valid.iter().filter(|(_, e)| e.min_z() <= lowest + 0.005).copied(),
        |(_, e)| e.avg_y().abs(),
    )
    .ok_or_else(|| SeamError::not_found("sleeve side start", &sleeve.name))?;

    let opts = TraceOptions {
        stop_angle: SIDE_STOP_ANGLE,
        measure: TurnMeasure::FoldInvariant,
    };
    let edges: Vec<BoundaryEdge> = trace_smooth(sleeve, start, opts, |cur, cand| {
        let rise = cand.avg_z() - cur.avg_z();
        0.0 < rise && rise < 0.1
    })
    .into_iter()
    .map(|i| *sleeve.edge(i))
    .collect();

    let side = if sleeve.edge(start).avg_y() > 0.0 {
        Side::Right
    } else {
        Side::Left
    };
    Ok((edges, side))
}

/// Armhole curve of a panel on one side.
///
/// Climbs the side seam from the bottom corner until the boundary
/// turns away, then follows the armhole from there until it turns
/// sharply again.
pub fn find_armhole(panel: &WorldMesh, side: Side) -> Result<Vec<BoundaryEdge>> {
    let height = panel.height();
    let z_tol = 0.02 * height;
    let conn_tol = 0.001 * height;
    let min_z = panel.bounds.min.z;

    let hem: Vec<Point3> = panel
        .edges
        .iter()
        .filter(|e| {
            let d = e.vector();
            e.length() > 0.0 && d.y.abs() > d.z.abs() && (e.avg_z() - min_z).abs() < z_tol
        })
        .flat_map(|e| [e.v1, e.v2])
        .collect();
    if hem.is_empty() {
        return Err(SeamError::not_found("hem", &panel.name));
    }

    // The climb starts at the hem corner, not at the widest vertex.
    let corner = match side {
        Side::Right => first_max_by(hem, |v| v.y),
        Side::Left => first_min_by(hem, |v| v.y),
    }
    .ok_or_else(|| SeamError::not_found("hem corner", &panel.name))?;

    let rising = panel.edges.iter().enumerate().filter(|(_, e)| {
        let d = e.vector();
        let up = if (e.v1 - corner).norm() < 0.01 {
            e.v2.z > e.v1.z
        } else {
            e.v1.z > e.v2.z
        };
        e.length() > 0.0 && e.touches(&corner, conn_tol) && up && d.z.abs() > d.y.abs()
    });
    let (first, first_edge) = first_max_by(rising, |(_, e)| e.vector().z.abs())
        .ok_or_else(|| SeamError::not_found("side seam", &panel.name))?;

    let mut processed = HashSet::from([first]);
    let mut top = first_edge.upper();
    let mut prev = first_edge.vector();
    let mut armhole_start = None;

    'climb: for _ in 0..ARMHOLE_MAX_STEPS {
        for (i, e) in panel.edges.iter().enumerate() {
            if processed.contains(&i) || e.length() <= 0.0 || !e.touches(&top, conn_tol) {
                continue;
            }
            if line_angle(&prev, &e.vector()) > ARMHOLE_START_ANGLE {
                armhole_start = Some((i, *e));
                break 'climb;
            }
            processed.insert(i);
            top = e.upper();
            prev = e.vector();
            continue 'climb;
        }
        break;
    }
    let (start, start_edge) =
        armhole_start.ok_or_else(|| SeamError::not_found("armhole start", &panel.name))?;

    processed.insert(start);
    let mut curve = vec![start_edge];
    let mut end = start_edge.upper();
    let mut prev = start_edge.vector();

    'follow: for _ in 0..ARMHOLE_MAX_STEPS {
        for (i, e) in panel.edges.iter().enumerate() {
            if processed.contains(&i) || e.length() <= 0.0 || !e.touches(&end, 0.01) {
                continue;
            }
            if line_angle(&prev, &e.vector()) > ARMHOLE_END_ANGLE {
                break 'follow;
            }
            processed.insert(i);
            curve.push(*e);
            end = e.upper();
            prev = e.vector();
            continue 'follow;
        }
        break;
    }

    if curve.len() < 2 {
        return Err(SeamError::not_found("armhole curve", &panel.name));
    }
    Ok(curve)
}

/// Midpoints of `edges`, ordered by Z and resampled to `n` by index.
fn spread_midpoints(edges: &[BoundaryEdge], n: usize) -> Vec<Point3> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|a, b| a.avg_z().total_cmp(&b.avg_z()));
    let len = sorted.len();
    if len == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let idx = if len == 1 || n == 1 { 0 } else { i * (len - 1) / (n - 1) };
            sorted[idx.min(len - 1)].midpoint()
        })
        .collect()
}

fn armhole_connector(
    sleeve: &WorldMesh,
    sleeve_edges: &[BoundaryEdge],
    panel: &WorldMesh,
    armhole: &[BoundaryEdge],
) -> SeamConnector {
    let n = sleeve_edges.len().min(armhole.len()).max(ARMHOLE_MIN_STITCHES);
    let sleeve_pts = spread_midpoints(sleeve_edges, n);
    let mut panel_pts = spread_midpoints(armhole, n);
    align_sequences(&sleeve_pts, &mut panel_pts);
    SeamConnector::new(
        SeamKind::SleeveToPanel,
        format!("{}_to_{}", sleeve.name, panel.name),
        &[&sleeve.name, &panel.name],
        sleeve_pts,
        panel_pts,
    )
}

/// Connectors from a sleeve to the front and back armholes.
///
/// The traced sleeve side is split at its middle by height: the lower
/// half goes to the front panel, the upper half to the back.
pub fn sleeve_to_panel_seams(
    sleeve: &WorldMesh,
    front: &WorldMesh,
    back: &WorldMesh,
) -> Result<Vec<SeamConnector>> {
    let (mut edges, side) = find_sleeve_side(sleeve)?;
    edges.sort_by(|a, b| a.avg_z().total_cmp(&b.avg_z()));
    let upper = edges.split_off(edges.len() / 2);
    let lower = edges;
    if lower.is_empty() || upper.is_empty() {
        return Err(SeamError::not_found("sleeve side halves", &sleeve.name));
    }

    let front_curve = find_armhole(front, side)?;
    let back_curve = find_armhole(back, side)?;
    Ok(vec![
        armhole_connector(sleeve, &lower, front, &front_curve),
        armhole_connector(sleeve, &upper, back, &back_curve),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::tests::yz_mesh;

    /// Panel in (y, z) with a vertical side from the hem corner, then a
    /// curved armhole swinging inward towards the shoulder.
    fn armhole_panel(name: &str) -> WorldMesh {
        yz_mesh(
            name,
            &[
                (-1.0, 0.0),
                (1.0, 0.0),
                (1.0, 0.5),
                (1.0, 1.0),
                (0.8, 1.2),
                (0.7, 1.4),
                (0.7, 1.6),
                (0.0, 1.9),
                (-1.0, 1.6),
            ],
        )
    }

    #[test]
    fn test_tube_splits_edges_by_height() {
        let sleeve = yz_mesh("sleeve_1", &[(0.0, 0.0), (2.0, 0.0), (2.0, 0.8), (0.0, 0.8)]);
        let seam = sleeve_horizontal_seam(&sleeve).unwrap();
        assert!(seam.is_self_seam());
        assert_eq!(seam.len(), TUBE_STITCHES);
        for (a, b) in &seam.pairs {
            assert!((a.z - 0.8).abs() < 1e-9);
            assert!(b.z.abs() < 1e-9);
        }
    }

    #[test]
    fn test_tube_needs_two_edges() {
        let tall = yz_mesh("sleeve_1", &[(0.0, 0.0), (0.05, 0.0), (0.05, 2.0), (0.0, 2.0)]);
        assert!(sleeve_horizontal_seam(&tall).is_err());
    }

    #[test]
    fn test_armhole_starts_where_side_turns() {
        let p = armhole_panel("front_panel");
        let curve = find_armhole(&p, Side::Right).unwrap();
        // (1.0, 1.0) -> (0.8, 1.2) turns 45 degrees off the side seam.
        assert!((curve[0].v1 - Point3::new(0.0, 1.0, 1.0)).norm() < 1e-9);
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn test_armhole_climbs_from_hem_corner_on_flared_panel() {
        // The side flares out past the hem before the armhole turns in,
        // so the widest vertex is not on the hem.
        let p = yz_mesh(
            "front_panel",
            &[
                (-1.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (1.3, 1.5),
                (0.9, 1.9),
                (0.0, 2.0),
                (-0.9, 1.9),
                (-1.3, 1.5),
                (-1.0, 1.0),
            ],
        );
        let curve = find_armhole(&p, Side::Right).unwrap();
        assert_eq!(curve.len(), 3);
        let joins = |e: &BoundaryEdge, a: Point3, b: Point3| {
            ((e.v1 - a).norm() < 1e-9 && (e.v2 - b).norm() < 1e-9)
                || ((e.v1 - b).norm() < 1e-9 && (e.v2 - a).norm() < 1e-9)
        };
        assert!(joins(
            &curve[0],
            Point3::new(0.0, 1.3, 1.5),
            Point3::new(0.0, 0.9, 1.9)
        ));
    }

    #[test]
    fn test_sleeve_side_trace_and_split() {
        // Sleeve side rising gently from the lowest point near Y = 0.
        let sleeve = yz_mesh(
            "sleeve_1",
            &[
                (0.3, 0.0),
                (0.35, 0.08),
                (0.38, 0.16),
                (0.4, 0.24),
                (0.41, 0.32),
                (2.0, 0.32),
                (2.0, 0.0),
            ],
        );
        let (edges, side) = find_sleeve_side(&sleeve).unwrap();
        assert_eq!(side, Side::Right);
        assert_eq!(edges.len(), 4);

        let front = armhole_panel("front_panel");
        let back = armhole_panel("back_panel");
        let seams = sleeve_to_panel_seams(&sleeve, &front, &back).unwrap();
        assert_eq!(seams.len(), 2);
        assert_eq!(seams[0].pieces[1], "front_panel");
        assert_eq!(seams[1].pieces[1], "back_panel");
        assert!(seams.iter().all(|s| s.len() == ARMHOLE_MIN_STITCHES));
        // Lower half of the sleeve side goes to the front.
        let front_max = seams[0].pairs.iter().map(|(a, _)| a.z).fold(f64::MIN, f64::max);
        let back_min = seams[1].pairs.iter().map(|(a, _)| a.z).fold(f64::MAX, f64::min);
        assert!(front_max < back_min);
    }
}
