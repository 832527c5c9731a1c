//! Planar piece meshes.
//!
//! A normalized outline becomes a closed loop of vertices with one
//! n-gon face. The mesh keeps its vertices in local coordinates and
//! carries a location and XYZ Euler rotation that place it in the scene.

use std::collections::HashMap;

use fashionsynth_math::{Aabb3, Outline, Point3, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};
use crate::role::PartRole;

/// An undirected edge key with the smaller vertex index first.
pub type EdgeKey = (usize, usize);

/// Normalize an edge's endpoints into an [`EdgeKey`].
pub fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Flat mesh of one pattern piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceMesh {
    /// Vertices in local coordinates.
    pub vertices: Vec<Point3>,
    /// Edges as vertex index pairs.
    pub edges: Vec<[usize; 2]>,
    /// Faces as vertex index loops.
    pub faces: Vec<Vec<usize>>,
    /// Seam flag per edge.
    pub seams: Vec<bool>,
    /// Scene translation.
    pub location: Vec3,
    /// Scene rotation as XYZ Euler angles in radians.
    pub rotation: Vec3,
}

impl PieceMesh {
    /// Local-to-world transform.
    pub fn world_matrix(&self) -> Transform {
        Transform::placement(&self.location, &self.rotation)
    }

    /// Vertices in world coordinates.
    pub fn world_vertices(&self) -> Vec<Point3> {
        let m = self.world_matrix();
        self.vertices.iter().map(|v| m.apply_point(v)).collect()
    }

    /// World-space bounding box.
    pub fn world_bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.world_vertices())
    }

    /// Local-space bounding box.
    pub fn local_bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.vertices)
    }

    /// Number of faces using each edge.
    pub fn edge_face_counts(&self) -> HashMap<EdgeKey, usize> {
        let mut counts: HashMap<EdgeKey, usize> =
            self.edges.iter().map(|e| (edge_key(e[0], e[1]), 0)).collect();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                *counts.entry(edge_key(a, b)).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        let counts = self.edge_face_counts();
        self.edges
            .iter()
            .filter(|e| counts.get(&edge_key(e[0], e[1])) == Some(&1))
            .copied()
            .collect()
    }

    /// Number of edges flagged as seams.
    pub fn seam_count(&self) -> usize {
        self.seams.iter().filter(|s| **s).count()
    }
}

/// Build the mesh of a normalized outline.
///
/// Sleeves are laid in the YZ plane as `(0, x/s, -y/s)`, every other
/// role in the XZ plane as `(x/s, 0, -y/s)`. The vertex set is then
/// centered on its bounding-box midpoint, connected cyclically, filled
/// with one face, and every edge is marked as a seam.
///
/// # Errors
///
/// Returns [`PatternError::TooFewPoints`] for outlines with fewer than
/// three points.
pub fn build_mesh(outline: &Outline, role: PartRole, scale: f64) -> Result<PieceMesh> {
    let n = outline.len();
    if n < 3 {
        return Err(PatternError::TooFewPoints { found: n });
    }

    let mut vertices: Vec<Point3> = outline
        .points
        .iter()
        .map(|p| {
            let (u, v) = (p.x / scale, -p.y / scale);
            if role.uses_side_plane() {
                Point3::new(0.0, u, v)
            } else {
                Point3::new(u, 0.0, v)
            }
        })
        .collect();

    if let Some(bounds) = Aabb3::from_points(&vertices) {
        let offset = bounds.center().coords;
        for v in &mut vertices {
            *v -= offset;
        }
    }

    let edges: Vec<[usize; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
    let seams = vec![true; edges.len()];
    log::trace!("built {role} mesh with {n} vertices");

    Ok(PieceMesh {
        vertices,
        edges,
        faces: vec![(0..n).collect()],
        seams,
        location: Vec3::zeros(),
        rotation: Vec3::zeros(),
    })
}
