//! Hood seams: the center seam between the halves and the hood bottom
//! to the panel necklines.

use crate::connector::{SeamConnector, SeamKind};
use crate::edge::{first_max_by, first_min_by, BoundaryEdge, WorldMesh};
use crate::error::{Result, SeamError};
use crate::panel::Neckline;
use crate::resample::{interpolate_along_y, lerp_points};
use crate::trace::{trace_smooth, TraceOptions, TurnMeasure};

/// Minimum |dz| of a hood center edge.
pub const CENTER_MIN_DZ: f64 = 0.5;
/// Maximum |dy| of a hood center edge.
pub const CENTER_MAX_DY: f64 = 0.3;
/// Maximum |dx| of a hood center edge.
pub const CENTER_MAX_DX: f64 = 0.1;
/// Stitches along the hood center seam.
pub const CENTER_STITCHES: usize = 5;

/// Fraction of the hood height, measured from the bottom, that
/// counts as the bottom region.
pub const BOTTOM_REGION: f64 = 0.1;
/// Turn above which the hood bottom trace stops (degrees).
pub const BOTTOM_STOP_ANGLE: f64 = 60.0;
/// Stitches per hood-to-panel connector.
pub const NECK_STITCHES: usize = 6;

/// Center seam joining two hood halves.
///
/// On each half the center edge is the near-vertical edge closest to
/// Y = 0. Stitches run five evenly spaced pairs from `v1` to `v2` of
/// each edge.
pub fn hood_center_seam(first: &WorldMesh, second: &WorldMesh) -> Result<SeamConnector> {
    let a = center_edge(first)?;
    let b = center_edge(second)?;
    Ok(SeamConnector::new(
        SeamKind::HoodCenter,
        format!("seam_{}_{}", first.name, second.name),
        &[&first.name, &second.name],
        lerp_points(&a.v1, &a.v2, CENTER_STITCHES),
        lerp_points(&b.v1, &b.v2, CENTER_STITCHES),
    ))
}

fn center_edge(hood: &WorldMesh) -> Result<BoundaryEdge> {
    let candidates = hood.edges.iter().filter(|e| {
        let d = e.vector();
        d.z.abs() > CENTER_MIN_DZ && d.y.abs() < CENTER_MAX_DY && d.x.abs() < CENTER_MAX_DX
    });
    first_min_by(candidates, |e| e.avg_y().abs())
        .copied()
        .ok_or_else(|| SeamError::not_found("hood center edge", &hood.name))
}

/// Trace the bottom curve of a hood.
///
/// The trace starts next to the longest Z-dominant edge, on the lowest
/// Y-dominant neighbour inside the bottom region, and follows the
/// smoothest continuation through Y-dominant edges. Returns edge
/// indices in trace order.
pub fn find_hood_bottom(hood: &WorldMesh) -> Result<Vec<usize>> {
    let threshold = hood.bounds.min.z + BOTTOM_REGION * hood.height();

    let vertical = hood.edges.iter().enumerate().filter(|(_, e)| {
        let d = e.vector();
        d.z.abs() > 0.1 && d.z.abs() > d.y.abs() && d.z.abs() > d.x.abs()
    });
    let (longest, _) = first_max_by(vertical, |(_, e)| e.length())
        .ok_or_else(|| SeamError::not_found("hood side edge", &hood.name))?;

    let starts = hood.neighbours(longest).into_iter().filter(|&i| {
        let e = hood.edge(i);
        let d = e.vector();
        e.avg_z() <= threshold && d.y.abs() > 0.02 && d.y.abs() > d.z.abs() && d.y.abs() > d.x.abs()
    });
    let start = first_min_by(starts, |&i| hood.edge(i).avg_z())
        .ok_or_else(|| SeamError::not_found("hood bottom edge", &hood.name))?;

    let opts = TraceOptions {
        stop_angle: BOTTOM_STOP_ANGLE,
        measure: TurnMeasure::Directed,
    };
    Ok(trace_smooth(hood, start, opts, |_, cand| cand.vector().y.abs() > 0.01))
}

/// Split edges ordered by Y into two halves of about equal length.
///
/// Edges go to the first half while the running length stays within
/// half the total.
pub fn split_by_length(edges: &[BoundaryEdge]) -> (Vec<BoundaryEdge>, Vec<BoundaryEdge>) {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|a, b| a.avg_y().total_cmp(&b.avg_y()));
    let half = sorted.iter().map(BoundaryEdge::length).sum::<f64>() / 2.0;

    let mut walked = 0.0;
    let mut split = 0;
    for e in &sorted {
        if walked + e.length() > half {
            break;
        }
        walked += e.length();
        split += 1;
    }
    let inner = sorted.split_off(split);
    (sorted, inner)
}

/// Connectors from a hood bottom to the front and back necklines.
///
/// The hood bottom is split in two by length. A hood left of center
/// sews its outer half to the left front neckline and its inner half
/// to the left back; a hood right of center sews its outer half to
/// the right back and its inner half to the right front. A connector
/// whose neckline half is empty is left out.
pub fn hood_to_panel_seams(
    hood: &WorldMesh,
    front: &Neckline,
    back: &Neckline,
) -> Result<Vec<SeamConnector>> {
    let bottom: Vec<BoundaryEdge> = find_hood_bottom(hood)?
        .into_iter()
        .map(|i| *hood.edge(i))
        .collect();
    let (outer, inner) = split_by_length(&bottom);
    if outer.is_empty() || inner.is_empty() {
        return Err(SeamError::not_found("hood bottom halves", &hood.name));
    }

    let mean_y = bottom.iter().map(BoundaryEdge::avg_y).sum::<f64>() / bottom.len() as f64;
    let left = mean_y < 0.0;
    let half = |neck: &Neckline| -> Vec<BoundaryEdge> {
        neck.edges
            .iter()
            .filter(|e| (e.avg_y() < 0.0) == left)
            .copied()
            .collect()
    };
    let (front_half, back_half) = (half(front), half(back));
    let plan: [(&[BoundaryEdge], &Neckline, &[BoundaryEdge]); 2] = if left {
        [(&outer, front, &front_half), (&inner, back, &back_half)]
    } else {
        [(&outer, back, &back_half), (&inner, front, &front_half)]
    };

    let mut out = Vec::new();
    for (hood_edges, neck, panel_edges) in plan {
        if panel_edges.is_empty() {
            log::debug!("{}: no {} neckline on this side", hood.name, neck.piece);
            continue;
        }
        out.push(SeamConnector::new(
            SeamKind::HoodToPanel,
            format!("{}_to_{}", hood.name, neck.piece),
            &[&hood.name, &neck.piece],
            interpolate_along_y(hood_edges, NECK_STITCHES),
            interpolate_along_y(panel_edges, NECK_STITCHES),
        ));
    }
    Ok(out)
}
