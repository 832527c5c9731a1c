//! Greedy angle-threshold curve tracing.

use std::collections::HashSet;

use crate::edge::{angle_between, BoundaryEdge, WorldMesh};

/// How the turn between two edges is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMeasure {
    /// Angle between the stored edge directions, 0 to 180.
    Directed,
    /// `min(a, 180 - a)`, indifferent to edge winding.
    FoldInvariant,
}

impl TurnMeasure {
    fn turn(self, from: &BoundaryEdge, to: &BoundaryEdge) -> f64 {
        let a = angle_between(&from.vector(), &to.vector());
        match self {
            TurnMeasure::Directed => a,
            TurnMeasure::FoldInvariant => a.min(180.0 - a),
        }
    }
}

/// Parameters of a greedy walk.
#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    /// The walk stops when the smoothest continuation turns more than this (degrees).
    pub stop_angle: f64,
    /// Turn measure.
    pub measure: TurnMeasure,
}

/// Walk from `start` through adjacent edges, always taking the
/// unvisited neighbour with the smallest turn.
///
/// `accept(current, candidate)` filters candidates before the turn is
/// measured. The walk ends when no candidate passes the filter or the
/// best one turns more than [`TraceOptions::stop_angle`]. Returns the
/// visited edge indices in walk order, starting with `start`.
pub fn trace_smooth<F>(mesh: &WorldMesh, start: usize, opts: TraceOptions, accept: F) -> Vec<usize>
where
    F: Fn(&BoundaryEdge, &BoundaryEdge) -> bool,
{
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut current = start;

    while visited.insert(current) {
        path.push(current);
        let here = mesh.edge(current);

        let best = mesh
            .neighbours(current)
            .into_iter()
            .filter(|n| !visited.contains(n))
            .filter(|&n| accept(here, mesh.edge(n)))
            .map(|n| (n, opts.measure.turn(here, mesh.edge(n))))
            .fold(None::<(usize, f64)>, |best, cand| match best {
                Some(b) if b.1 <= cand.1 => Some(b),
                _ => Some(cand),
            });

        match best {
            Some((next, angle)) if angle <= opts.stop_angle => current = next,
            Some((_, angle)) => {
                log::trace!("trace on {} stopped at {angle:.1} degree turn", mesh.name);
                break;
            }
            None => break,
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::tests::yz_mesh;

    #[test]
    fn test_walk_stops_at_corner() {
        // Gentle arc along the bottom, then a sharp corner up.
        let w = yz_mesh(
            "arc",
            &[
                (0.0, 0.0),
                (1.0, 0.1),
                (2.0, 0.3),
                (3.0, 0.6),
                (3.0, 3.0),
                (0.0, 3.0),
            ],
        );
        let opts = TraceOptions {
            stop_angle: 60.0,
            measure: TurnMeasure::Directed,
        };
        let path = trace_smooth(&w, 0, opts, |_, _| true);
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_limits_candidates() {
        let w = yz_mesh("sq", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let opts = TraceOptions {
            stop_angle: 180.0,
            measure: TurnMeasure::Directed,
        };
        let all = trace_smooth(&w, 0, opts, |_, _| true);
        assert_eq!(all.len(), 4);
        let none = trace_smooth(&w, 0, opts, |_, _| false);
        assert_eq!(none, vec![0]);
    }

    #[test]
    fn test_fold_invariant_ignores_winding() {
        let a = BoundaryEdge {
            a: 0,
            b: 1,
            v1: fashionsynth_math::Point3::new(0.0, 0.0, 0.0),
            v2: fashionsynth_math::Point3::new(0.0, 0.0, 1.0),
        };
        let reversed = BoundaryEdge {
            v1: a.v2,
            v2: a.v1,
            ..a
        };
        assert!((TurnMeasure::Directed.turn(&a, &reversed) - 180.0).abs() < 1e-9);
        assert!(TurnMeasure::FoldInvariant.turn(&a, &reversed).abs() < 1e-9);
    }
}
