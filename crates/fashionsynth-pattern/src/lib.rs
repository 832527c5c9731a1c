#![warn(missing_docs)]

//! Pattern pieces for the fashionsynth garment pipeline.
//!
//! Holds the garment definition table, the role of each part, the
//! outline normalizer that orients and completes half patterns, and the
//! builder that turns a normalized outline into a flat scene mesh.

mod catalog;
mod error;
pub mod mesh;
pub mod normalize;
mod piece;
mod role;

pub use catalog::{
    garment_defaults, ipfs_to_gateway_url, GarmentType, PartDefinition, INFURA_GATEWAY,
};
pub use error::{PatternError, Result};
pub use mesh::{build_mesh, edge_key, EdgeKey, PieceMesh};
pub use normalize::{normalize_outline, scale_factor};
pub use piece::PatternPiece;
pub use role::PartRole;
