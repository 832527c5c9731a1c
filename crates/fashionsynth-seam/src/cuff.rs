//! Cuff seams: sleeve end to cuff, and the cuff closed into a ring.

use crate::connector::{align_endpoints, SeamConnector, SeamKind};
use crate::edge::{BoundaryEdge, WorldMesh};
use crate::error::{Result, SeamError};
use crate::resample::{interpolate_along_y, lerp_points};

/// Stitches along the sleeve to cuff seam.
pub const SLEEVE_CUFF_STITCHES: usize = 5;
/// Stitches along each side of a ring closure.
pub const RING_STITCHES: usize = 10;
/// Z distance grouping the top and bottom edges of a cuff.
pub const RING_Z_TOLERANCE: f64 = 0.05;

fn vertical_edges(mesh: &WorldMesh) -> Vec<BoundaryEdge> {
    mesh.edges
        .iter()
        .filter(|e| {
            let dz = e.vector().z.abs();
            let len = e.length();
            len > 0.0 && dz > 0.3 && dz / len > 0.7
        })
        .copied()
        .collect()
}

/// Seam joining a sleeve to its cuff along their closest vertical edges.
pub fn sleeve_cuff_seam(sleeve: &WorldMesh, cuff: &WorldMesh) -> Result<SeamConnector> {
    let sleeve_edges = vertical_edges(sleeve);
    if sleeve_edges.is_empty() {
        return Err(SeamError::not_found("vertical edge", &sleeve.name));
    }
    let cuff_edges = vertical_edges(cuff);
    if cuff_edges.is_empty() {
        return Err(SeamError::not_found("vertical edge", &cuff.name));
    }

    let mut best: Option<(BoundaryEdge, BoundaryEdge, f64)> = None;
    for s in &sleeve_edges {
        for c in &cuff_edges {
            let d = (s.midpoint() - c.midpoint()).norm();
            if best.map_or(true, |(_, _, b)| d < b) {
                best = Some((*s, *c, d));
            }
        }
    }
    let Some((s, c, d)) = best else {
        return Err(SeamError::not_found("edge pair", &cuff.name));
    };
    log::debug!("{} to {}: closest edges {d:.3} apart", sleeve.name, cuff.name);

    let c_pts = align_endpoints((s.v1, s.v2), (c.v1, c.v2));
    Ok(SeamConnector::new(
        SeamKind::SleeveCuff,
        format!("seam_{}_{}", sleeve.name, cuff.name),
        &[&sleeve.name, &cuff.name],
        lerp_points(&s.v1, &s.v2, SLEEVE_CUFF_STITCHES),
        lerp_points(&c_pts.0, &c_pts.1, SLEEVE_CUFF_STITCHES),
    ))
}

/// Ring closure joining a cuff's bottom edges to its top edges.
pub fn cuff_horizontal_seam(cuff: &WorldMesh) -> Result<SeamConnector> {
    let mut edges: Vec<BoundaryEdge> = cuff
        .edges
        .iter()
        .filter(|e| {
            let d = e.vector();
            d.y.abs() > 0.1 && d.y.abs() > d.z.abs() && d.y.abs() > d.x.abs()
        })
        .copied()
        .collect();
    if edges.len() < 2 {
        return Err(SeamError::not_found("horizontal edges", &cuff.name));
    }
    edges.sort_by(|a, b| a.avg_z().total_cmp(&b.avg_z()));

    let (lowest, highest) = (edges[0].avg_z(), edges[edges.len() - 1].avg_z());
    let near = |z: f64| -> Vec<BoundaryEdge> {
        edges
            .iter()
            .filter(|e| (e.avg_z() - z).abs() < RING_Z_TOLERANCE)
            .copied()
            .collect()
    };
    let (bottom, top) = (near(lowest), near(highest));

    Ok(SeamConnector::new(
        SeamKind::CuffHorizontal,
        format!("seam_{}_ring", cuff.name),
        &[&cuff.name],
        interpolate_along_y(&bottom, RING_STITCHES),
        interpolate_along_y(&top, RING_STITCHES),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::tests::yz_mesh;

    #[test]
    fn test_sleeve_cuff_pairs_nearest_edges_without_crossing() {
        let sleeve = yz_mesh("sleeve_1", &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);
        let cuff = yz_mesh("sleeve_cuff_1", &[(2.1, 0.0), (2.5, 0.0), (2.5, 1.0), (2.1, 1.0)]);
        let seam = sleeve_cuff_seam(&sleeve, &cuff).unwrap();
        assert_eq!(seam.len(), SLEEVE_CUFF_STITCHES);
        for (a, b) in &seam.pairs {
            assert!((a.y - 2.0).abs() < 1e-9);
            assert!((b.y - 2.1).abs() < 1e-9);
            assert!((a.z - b.z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_strip_has_no_vertical_edge() {
        let sleeve = yz_mesh("sleeve_1", &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);
        let flat = yz_mesh("sleeve_cuff_1", &[(0.0, 0.0), (2.0, 0.0), (2.0, 0.2), (0.0, 0.2)]);
        assert!(sleeve_cuff_seam(&sleeve, &flat).is_err());
    }

    #[test]
    fn test_ring_joins_bottom_to_top() {
        let cuff = yz_mesh("sleeve_cuff_1", &[(0.0, 0.0), (1.0, 0.0), (1.0, 0.3), (0.0, 0.3)]);
        let seam = cuff_horizontal_seam(&cuff).unwrap();
        assert!(seam.is_self_seam());
        assert_eq!(seam.len(), RING_STITCHES);
        for (a, b) in &seam.pairs {
            assert!(a.z.abs() < 1e-9);
            assert!((b.z - 0.3).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
        }
    }
}
