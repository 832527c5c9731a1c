//! Seam connectors and their line meshes.

use fashionsynth_math::Point3;
use serde::{Deserialize, Serialize};

/// Which seam a connector stitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamKind {
    /// Center seam joining the two hood halves.
    HoodCenter,
    /// Sleeve end to cuff.
    SleeveCuff,
    /// Front to back panel side seam.
    PanelSide,
    /// Waistband to the panel hems.
    WaistBand,
    /// Pocket to front panel.
    Pocket,
    /// Neck binding to the panel necklines.
    NeckBinding,
    /// Front to back shoulder seam.
    Shoulder,
    /// Sleeve closed into a tube.
    SleeveHorizontal,
    /// Cuff closed into a ring.
    CuffHorizontal,
    /// Hood bottom to a panel neckline.
    HoodToPanel,
    /// Sleeve side to a panel armhole.
    SleeveToPanel,
}

impl SeamKind {
    /// Display colour as linear RGB.
    pub fn color(self) -> [f32; 3] {
        match self {
            SeamKind::HoodCenter => [1.0, 0.0, 0.0],
            SeamKind::SleeveCuff => [0.0, 1.0, 0.0],
            SeamKind::PanelSide => [0.0, 0.0, 1.0],
            SeamKind::WaistBand => [1.0, 0.5, 0.0],
            SeamKind::Pocket => [0.5, 0.0, 1.0],
            SeamKind::NeckBinding => [0.0, 1.0, 1.0],
            SeamKind::Shoulder => [1.0, 1.0, 0.0],
            SeamKind::SleeveHorizontal => [1.0, 0.4, 0.7],
            SeamKind::CuffHorizontal => [0.4, 0.7, 1.0],
            SeamKind::HoodToPanel => [0.8, 0.4, 1.0],
            SeamKind::SleeveToPanel => [1.0, 0.0, 1.0],
        }
    }

    /// Whether creating this seam asks for cloth physics on its pieces.
    pub fn requests_cloth(self) -> bool {
        !matches!(self, SeamKind::HoodToPanel | SeamKind::SleeveToPanel)
    }
}

/// Paired stitch points between two boundary curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeamConnector {
    /// Seam type.
    pub kind: SeamKind,
    /// Connector name.
    pub name: String,
    /// Pieces the seam joins, in the order their points appear in the
    /// pairs. A seam closing a single piece lists it once.
    pub pieces: Vec<String>,
    /// Stitch pairs.
    pub pairs: Vec<(Point3, Point3)>,
}

impl SeamConnector {
    /// Create a connector by pairing two point sets index by index.
    ///
    /// Extra points on the longer side are dropped.
    pub fn new(
        kind: SeamKind,
        name: impl Into<String>,
        pieces: &[&str],
        a: Vec<Point3>,
        b: Vec<Point3>,
    ) -> Self {
        Self::from_pairs(kind, name, pieces, a.into_iter().zip(b).collect())
    }

    /// Create a connector from ready-made pairs.
    pub fn from_pairs(
        kind: SeamKind,
        name: impl Into<String>,
        pieces: &[&str],
        pairs: Vec<(Point3, Point3)>,
    ) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(pieces.len());
        for p in pieces {
            if !names.iter().any(|n| n == p) {
                names.push((*p).to_string());
            }
        }
        Self {
            kind,
            name: name.into(),
            pieces: names,
            pairs,
        }
    }

    /// Number of stitches.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the connector has no stitches.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of stitch lengths.
    pub fn total_length(&self) -> f64 {
        self.pairs.iter().map(|(a, b)| (b - a).norm()).sum()
    }

    /// True when the seam closes a single piece.
    pub fn is_self_seam(&self) -> bool {
        self.pieces.len() == 1
    }

    /// Wire mesh of the stitches: vertices in pairs, edge `k` joins
    /// vertices `2k` and `2k + 1`.
    pub fn to_line_mesh(&self) -> LineMesh {
        let mut vertices = Vec::with_capacity(self.pairs.len() * 2);
        let mut edges = Vec::with_capacity(self.pairs.len());
        for (k, (a, b)) in self.pairs.iter().enumerate() {
            vertices.push(*a);
            vertices.push(*b);
            edges.push([2 * k, 2 * k + 1]);
        }
        LineMesh {
            name: self.name.clone(),
            color: self.kind.color(),
            vertices,
            edges,
        }
    }
}

/// Edge-only mesh visualizing a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMesh {
    /// Mesh name.
    pub name: String,
    /// Display colour.
    pub color: [f32; 3],
    /// Vertices.
    pub vertices: Vec<Point3>,
    /// Edges.
    pub edges: Vec<[usize; 2]>,
}

/// Orient edge `b` to run the same way as edge `a`.
///
/// The endpoints of `b` are swapped when pairing them crosswise with
/// `a` is shorter than pairing them straight.
pub fn align_endpoints(a: (Point3, Point3), b: (Point3, Point3)) -> (Point3, Point3) {
    let straight = (a.0 - b.0).norm() + (a.1 - b.1).norm();
    let crossed = (a.0 - b.1).norm() + (a.1 - b.0).norm();
    if crossed < straight {
        (b.1, b.0)
    } else {
        b
    }
}

/// Reverse `b` if index-pairing it backwards against `a` is shorter.
pub fn align_sequences(a: &[Point3], b: &mut [Point3]) {
    if a.len() < 2 || b.len() < 2 {
        return;
    }
    let n = a.len().min(b.len());
    let forward: f64 = (0..n).map(|i| (a[i] - b[i]).norm()).sum();
    let backward: f64 = (0..n).map(|i| (a[i] - b[b.len() - 1 - i]).norm()).sum();
    if backward < forward {
        b.reverse();
    }
}
