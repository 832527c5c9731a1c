//! World-space boundary edges and their adjacency.
//!
//! Seam finders never touch a [`PieceMesh`] directly. They work on a
//! [`WorldMesh`]: the piece's boundary edges with endpoints already
//! transformed into the scene, plus a vertex-to-edge index.

use std::collections::HashMap;

use fashionsynth_math::{Aabb3, Point3, Vec3};
use fashionsynth_pattern::PieceMesh;

/// Classification of an edge by its dominant direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    /// Within the threshold of the Z (height) axis.
    Vertical,
    /// Within the threshold of the Y (width) axis.
    Horizontal,
    /// Neither.
    Oblique,
}

/// One boundary edge in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEdge {
    /// First vertex index.
    pub a: usize,
    /// Second vertex index.
    pub b: usize,
    /// World position of `a`.
    pub v1: Point3,
    /// World position of `b`.
    pub v2: Point3,
}

impl BoundaryEdge {
    /// Direction from `v1` to `v2`.
    pub fn vector(&self) -> Vec3 {
        self.v2 - self.v1
    }

    /// Edge length.
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Midpoint.
    pub fn midpoint(&self) -> Point3 {
        Point3::from((self.v1.coords + self.v2.coords) / 2.0)
    }

    /// Mean Y of the endpoints.
    pub fn avg_y(&self) -> f64 {
        (self.v1.y + self.v2.y) / 2.0
    }

    /// Mean Z of the endpoints.
    pub fn avg_z(&self) -> f64 {
        (self.v1.z + self.v2.z) / 2.0
    }

    /// Lower Z of the endpoints.
    pub fn min_z(&self) -> f64 {
        self.v1.z.min(self.v2.z)
    }

    /// Endpoint with the greater Z; ties return `v2`.
    pub fn upper(&self) -> Point3 {
        if self.v1.z > self.v2.z {
            self.v1
        } else {
            self.v2
        }
    }

    /// Endpoint with the lesser Z; ties return `v2`.
    pub fn lower(&self) -> Point3 {
        if self.v1.z < self.v2.z {
            self.v1
        } else {
            self.v2
        }
    }

    /// Endpoints ordered by increasing Y.
    pub fn by_y(&self) -> (Point3, Point3) {
        if self.v1.y > self.v2.y {
            (self.v2, self.v1)
        } else {
            (self.v1, self.v2)
        }
    }

    /// Angle to the Z axis in degrees, `acos(|dz| / len)`.
    ///
    /// Zero-length edges report 90.
    pub fn angle_from_vertical(&self) -> f64 {
        axis_angle(self.vector().z, self.length())
    }

    /// Angle to the Y axis in degrees, `acos(|dy| / len)`.
    ///
    /// Zero-length edges report 90.
    pub fn angle_from_horizontal(&self) -> f64 {
        axis_angle(self.vector().y, self.length())
    }

    /// Classify against an angle threshold in degrees.
    pub fn classify(&self, threshold: f64) -> EdgeClass {
        if self.angle_from_vertical() < threshold {
            EdgeClass::Vertical
        } else if self.angle_from_horizontal() < threshold {
            EdgeClass::Horizontal
        } else {
            EdgeClass::Oblique
        }
    }

    /// True if the edge has an endpoint within `tol` of `p`.
    pub fn touches(&self, p: &Point3, tol: f64) -> bool {
        (self.v1 - p).norm() < tol || (self.v2 - p).norm() < tol
    }

    /// True if both edges share a vertex index.
    pub fn shares_vertex(&self, other: &BoundaryEdge) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }
}

fn axis_angle(component: f64, length: f64) -> f64 {
    if length <= 0.0 {
        return 90.0;
    }
    (component.abs() / length).min(1.0).acos().to_degrees()
}

/// Angle between two direction vectors in degrees, 0 for degenerate input.
pub fn angle_between(u: &Vec3, v: &Vec3) -> f64 {
    let (nu, nv) = (u.norm(), v.norm());
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Angle between the lines carrying two vectors, ignoring direction.
pub fn line_angle(u: &Vec3, v: &Vec3) -> f64 {
    let (nu, nv) = (u.norm(), v.norm());
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0).abs().acos().to_degrees()
}

/// First item with the greatest key.
pub(crate) fn first_max_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let k = key(&item);
        if best.as_ref().map_or(true, |(_, b)| k > *b) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

/// First item with the smallest key.
pub(crate) fn first_min_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    first_max_by(items, |item| -key(item))
}

/// A piece's boundary in world space.
#[derive(Debug, Clone)]
pub struct WorldMesh {
    /// Piece name.
    pub name: String,
    /// Piece location in the scene.
    pub location: Vec3,
    /// World-space vertices.
    pub vertices: Vec<Point3>,
    /// Boundary edges in mesh order.
    pub edges: Vec<BoundaryEdge>,
    /// World-space bounds.
    pub bounds: Aabb3,
    vertex_edges: HashMap<usize, Vec<usize>>,
}

impl WorldMesh {
    /// Snapshot a placed mesh. Returns `None` for a mesh with no vertices.
    pub fn new(name: impl Into<String>, mesh: &PieceMesh) -> Option<Self> {
        let vertices = mesh.world_vertices();
        let bounds = Aabb3::from_points(&vertices)?;
        let edges: Vec<BoundaryEdge> = mesh
            .boundary_edges()
            .iter()
            .map(|&[a, b]| BoundaryEdge {
                a,
                b,
                v1: vertices[a],
                v2: vertices[b],
            })
            .collect();
        let mut vertex_edges: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, e) in edges.iter().enumerate() {
            vertex_edges.entry(e.a).or_default().push(i);
            if e.b != e.a {
                vertex_edges.entry(e.b).or_default().push(i);
            }
        }
        Some(Self {
            name: name.into(),
            location: mesh.location,
            vertices,
            edges,
            bounds,
            vertex_edges,
        })
    }

    /// Edge by index.
    pub fn edge(&self, index: usize) -> &BoundaryEdge {
        &self.edges[index]
    }

    /// Edges sharing a vertex with edge `index`, excluding itself.
    pub fn neighbours(&self, index: usize) -> Vec<usize> {
        let e = &self.edges[index];
        let mut out = Vec::new();
        for v in [e.a, e.b] {
            if let Some(list) = self.vertex_edges.get(&v) {
                for &other in list {
                    if other != index && !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }
        out
    }

    /// Height of the piece (Z span).
    pub fn height(&self) -> f64 {
        self.bounds.span().z
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fashionsynth_pattern::{build_mesh, PartRole};
    use fashionsynth_math::Outline;

    /// World mesh of an outline given directly in (y, z) scene coordinates.
    pub(crate) fn yz_mesh(name: &str, pts: &[(f64, f64)]) -> WorldMesh {
        let flat: Vec<f64> = pts.iter().flat_map(|&(y, z)| [y, -z]).collect();
        let mut mesh = build_mesh(&Outline::from_flat(&flat), PartRole::Sleeve, 1.0).unwrap();
        // Undo centering so coordinates read exactly as given.
        let given: Vec<Point3> = pts.iter().map(|&(y, z)| Point3::new(0.0, y, z)).collect();
        mesh.location = Aabb3::from_points(&given).unwrap().center().coords;
        WorldMesh::new(name, &mesh).unwrap()
    }

    #[test]
    fn test_yz_mesh_helper_preserves_coordinates() {
        let w = yz_mesh("sq", &[(0.0, 0.0), (1.0, 0.0), (1.0, 2.0), (0.0, 2.0)]);
        assert!((w.vertices[2] - Point3::new(0.0, 1.0, 2.0)).norm() < 1e-12);
        assert_eq!(w.edges.len(), 4);
    }

    #[test]
    fn test_upper_lower_ties_take_v2() {
        let flat = BoundaryEdge {
            a: 0,
            b: 1,
            v1: Point3::new(0.0, 0.0, 1.0),
            v2: Point3::new(0.0, 1.0, 1.0),
        };
        assert_eq!(flat.upper(), flat.v2);
        assert_eq!(flat.lower(), flat.v2);

        let rising = BoundaryEdge {
            v2: Point3::new(0.0, 1.0, 2.0),
            ..flat
        };
        assert_eq!(rising.upper(), rising.v2);
        assert_eq!(rising.lower(), rising.v1);
    }

    #[test]
    fn test_classification() {
        let vertical = BoundaryEdge {
            a: 0,
            b: 1,
            v1: Point3::new(0.0, 0.0, 0.0),
            v2: Point3::new(0.0, 0.1, 1.0),
        };
        assert_eq!(vertical.classify(30.0), EdgeClass::Vertical);

        let horizontal = BoundaryEdge {
            v2: Point3::new(0.0, 1.0, 0.1),
            ..vertical
        };
        assert_eq!(horizontal.classify(30.0), EdgeClass::Horizontal);

        let diagonal = BoundaryEdge {
            v2: Point3::new(0.0, 1.0, 1.0),
            ..vertical
        };
        assert_eq!(diagonal.classify(30.0), EdgeClass::Oblique);
        assert!((diagonal.angle_from_horizontal() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_classification_under_rotation() {
        use fashionsynth_math::Transform;
        use std::f64::consts::FRAC_PI_2;

        let e = BoundaryEdge {
            a: 0,
            b: 1,
            v1: Point3::new(0.0, 0.0, 0.0),
            v2: Point3::new(0.0, 0.0, 1.0),
        };
        let same = Transform::rotation_x(0.0);
        let turned = Transform::rotation_x(FRAC_PI_2);
        let apply = |t: &Transform| BoundaryEdge {
            v1: t.apply_point(&e.v1),
            v2: t.apply_point(&e.v2),
            ..e
        };
        assert_eq!(apply(&same).classify(30.0), EdgeClass::Vertical);
        assert_eq!(apply(&turned).classify(30.0), EdgeClass::Horizontal);
    }

    #[test]
    fn test_neighbours_on_loop() {
        let w = yz_mesh("sq", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut n = w.neighbours(0);
        n.sort();
        assert_eq!(n, vec![1, 3]);
    }

    #[test]
    fn test_first_extremes_keep_earliest() {
        let v = [(0, 1.0), (1, 3.0), (2, 3.0), (3, 1.0)];
        assert_eq!(first_max_by(v, |p| p.1).map(|p| p.0), Some(1));
        assert_eq!(first_min_by(v, |p| p.1).map(|p| p.0), Some(0));
        assert_eq!(first_max_by(Vec::<(usize, f64)>::new(), |p| p.1), None);
    }

    #[test]
    fn test_angles() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert!((angle_between(&x, &y) - 90.0).abs() < 1e-9);
        assert!((angle_between(&x, &-x) - 180.0).abs() < 1e-9);
        assert!(line_angle(&x, &-x).abs() < 1e-6);
        assert_eq!(angle_between(&x, &Vec3::zeros()), 0.0);
    }
}
