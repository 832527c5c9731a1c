#![warn(missing_docs)]

//! Seam matching between placed fashionsynth pattern pieces.
//!
//! Every finder works on [`WorldMesh`] snapshots of the placed pieces:
//! it classifies boundary edges by direction and height, traces the
//! curves that meet, and resamples both sides into paired stitch
//! points. A finder that cannot locate its feature returns
//! [`SeamError::FeatureNotFound`] and the caller skips that seam.
//!
//! All coordinates are scene units with Z up. Angle thresholds are in
//! degrees.

mod connector;
mod cuff;
pub mod edge;
mod error;
mod hem;
mod hood;
mod panel;
pub mod resample;
mod sleeve;
pub mod trace;

pub use connector::{align_endpoints, align_sequences, LineMesh, SeamConnector, SeamKind};
pub use cuff::{cuff_horizontal_seam, sleeve_cuff_seam};
pub use edge::{BoundaryEdge, EdgeClass, WorldMesh};
pub use error::{Result, SeamError};
pub use hem::{hem_edges, neck_binding_seam, pocket_seam, waistband_seam, Hem};
pub use hood::{find_hood_bottom, hood_center_seam, hood_to_panel_seams, split_by_length};
pub use panel::{
    find_neckline, find_shoulders, find_side_edges, panel_side_seam, shoulder_seams, Neckline,
    PanelFace, Side,
};
pub use sleeve::{find_armhole, find_sleeve_side, sleeve_horizontal_seam, sleeve_to_panel_seams};

/// Default spacing between stitches on length-driven seams.
pub const STITCH_SPACING: f64 = 0.05;
