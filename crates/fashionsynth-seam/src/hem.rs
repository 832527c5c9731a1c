//! Strip seams: waistband and neck binding onto the panels, and the
//! pocket onto the front panel.

use fashionsynth_math::Point3;

use crate::connector::{SeamConnector, SeamKind};
use crate::edge::{first_max_by, BoundaryEdge, WorldMesh};
use crate::error::{Result, SeamError};
use crate::panel::Neckline;
use crate::resample::{
    dedup_points, edge_vertices_by_y, lerp, lerp_points, point_at_fraction, spread, stitch_count,
    MATCH_TOLERANCE,
};

/// Z distance from the top or bottom within which a horizontal edge
/// counts as a hem.
pub const HEM_Z_TOLERANCE: f64 = 0.05;
/// Hem edges lie within this angle of horizontal (degrees).
pub const HEM_ANGLE: f64 = 30.0;
/// Stitches along each half of the waistband.
pub const WAISTBAND_STITCHES: usize = 10;

/// Top or bottom of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hem {
    /// Maximum Z.
    Top,
    /// Minimum Z.
    Bottom,
}

/// Near-horizontal edges at the top or bottom of a piece, ordered by
/// their lower Y.
pub fn hem_edges(mesh: &WorldMesh, hem: Hem) -> Vec<BoundaryEdge> {
    let target = match hem {
        Hem::Top => mesh.bounds.max.z,
        Hem::Bottom => mesh.bounds.min.z,
    };
    let mut edges: Vec<BoundaryEdge> = mesh
        .edges
        .iter()
        .filter(|e| {
            e.length() > 0.0
                && (e.avg_z() - target).abs() < HEM_Z_TOLERANCE
                && e.angle_from_horizontal() < HEM_ANGLE
        })
        .copied()
        .collect();
    edges.sort_by(|a, b| a.v1.y.min(a.v2.y).total_cmp(&b.v1.y.min(b.v2.y)));
    edges
}

/// Waistband seam: the front half of the band's top edge to the front
/// hem, the back half to the back hem.
pub fn waistband_seam(band: &WorldMesh, front: &WorldMesh, back: &WorldMesh) -> Result<SeamConnector> {
    let top = first_max_by(hem_edges(band, Hem::Top), BoundaryEdge::length)
        .ok_or_else(|| SeamError::not_found("waistband top edge", &band.name))?;
    let (start, end) = top.by_y();

    let front_hem = edge_vertices_by_y(&hem_edges(front, Hem::Bottom));
    let back_hem = edge_vertices_by_y(&hem_edges(back, Hem::Bottom));
    if front_hem.is_empty() || back_hem.is_empty() {
        return Err(SeamError::not_found("panel hem", &band.name));
    }

    let mut pairs = Vec::with_capacity(2 * WAISTBAND_STITCHES);
    for (offset, hem) in [(0.0, &front_hem), (0.5, &back_hem)] {
        for i in 0..WAISTBAND_STITCHES {
            let t = spread(i, WAISTBAND_STITCHES);
            if let Some(p) = point_at_fraction(hem, t) {
                pairs.push((lerp(&start, &end, offset + t * 0.5), p));
            }
        }
    }
    Ok(SeamConnector::from_pairs(
        SeamKind::WaistBand,
        format!("seam_{}_panels", band.name),
        &[&band.name, &front.name, &back.name],
        pairs,
    ))
}

/// Pocket seam: the pocket's top and bottom edges projected straight
/// onto the front panel plane.
pub fn pocket_seam(pocket: &WorldMesh, front: &WorldMesh, spacing: f64) -> Result<SeamConnector> {
    let top = hem_edges(pocket, Hem::Top);
    let bottom = hem_edges(pocket, Hem::Bottom);
    if top.is_empty() || bottom.is_empty() {
        return Err(SeamError::not_found("pocket hem", &pocket.name));
    }

    let plane_x = front.location.x;
    let mut pairs = Vec::new();
    for e in top.iter().chain(&bottom) {
        let (a, b) = e.by_y();
        for p in lerp_points(&a, &b, stitch_count(e.length(), spacing, 3)) {
            pairs.push((p, Point3::new(plane_x, p.y, p.z)));
        }
    }
    Ok(SeamConnector::from_pairs(
        SeamKind::Pocket,
        format!("seam_{}_{}", pocket.name, front.name),
        &[&pocket.name, &front.name],
        pairs,
    ))
}

/// Chain neckline vertices from the leftmost one through connected
/// edges, each edge used once.
fn chain_from_leftmost(edges: &[BoundaryEdge]) -> Vec<Point3> {
    let all: Vec<Point3> = edges.iter().flat_map(|e| [e.v1, e.v2]).collect();
    let Some(&start) = all.iter().min_by(|a, b| a.y.total_cmp(&b.y)) else {
        return Vec::new();
    };

    let near = |a: &Point3, b: &Point3| MATCH_TOLERANCE.points_equal(a, b);
    let mut path = vec![start];
    let mut used = vec![false; edges.len()];
    let mut current = start;
    for _ in 0..edges.len() {
        let mut next = None;
        for (i, e) in edges.iter().enumerate() {
            if used[i] {
                continue;
            }
            let other = if near(&current, &e.v1) {
                e.v2
            } else if near(&current, &e.v2) {
                e.v1
            } else {
                continue;
            };
            if !path.iter().any(|p| near(p, &other)) {
                used[i] = true;
                next = Some(other);
                break;
            }
        }
        match next {
            Some(p) => {
                path.push(p);
                current = p;
            }
            None => break,
        }
    }

    if path.len() < 2 {
        let mut fallback = dedup_points(all);
        fallback.sort_by(|a, b| a.y.total_cmp(&b.y));
        return fallback;
    }
    path
}

/// Neck binding seam: the binding's bottom edge, split in two by arc
/// length, onto the front and back necklines.
pub fn neck_binding_seam(
    binding: &WorldMesh,
    front: &Neckline,
    back: &Neckline,
    spacing: f64,
) -> Result<SeamConnector> {
    let strip = edge_vertices_by_y(&hem_edges(binding, Hem::Bottom));
    let (Some(first), Some(last)) = (strip.first(), strip.last()) else {
        return Err(SeamError::not_found("binding bottom edge", &binding.name));
    };
    let half = (last.y - first.y) / 2.0;
    let n = stitch_count(half, spacing, 5);

    let front_path = chain_from_leftmost(&front.edges);
    let back_path = edge_vertices_by_y(&back.edges);

    let mut pairs = Vec::with_capacity(2 * n);
    for (offset, path) in [(0.0, &front_path), (0.5, &back_path)] {
        for i in 0..n {
            let t = spread(i, n);
            let Some(on_strip) = point_at_fraction(&strip, offset + t * 0.5) else {
                continue;
            };
            let on_panel = point_at_fraction(path, t).unwrap_or(on_strip);
            pairs.push((on_strip, on_panel));
        }
    }
    Ok(SeamConnector::from_pairs(
        SeamKind::NeckBinding,
        format!("seam_{}_necklines", binding.name),
        &[&binding.name, &front.piece, &back.piece],
        pairs,
    ))
}
