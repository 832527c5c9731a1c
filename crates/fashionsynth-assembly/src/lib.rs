#![warn(missing_docs)]

//! Garment assembly for fashionsynth.
//!
//! Turns a garment's pattern SVGs into placed, stitched pieces:
//!
//! 1. each part is fetched from an [`SvgSource`], extracted and built
//!    into one [`PatternPiece`](fashionsynth_pattern::PatternPiece) per
//!    instance;
//! 2. the positioner places every piece against the ones built before it
//!    and cuffs are hung beside their sleeves;
//! 3. the seam stages join the pieces with connectors and request cloth
//!    physics on the pieces they sew;
//! 4. pieces that could not be placed are laid out flat.
//!
//! Missing inputs and unmatched seams are skipped and listed in the
//! [`GenerationReport`] instead of failing the run.
//!
//! ```no_run
//! use fashionsynth_assembly::{generate_garment, AssemblySettings, DirectorySource, GarmentAssembly};
//! use fashionsynth_pattern::GarmentType;
//!
//! let mut assembly = GarmentAssembly::new(GarmentType::Hoodie);
//! let source = DirectorySource::new("patterns/hoodie");
//! let report = generate_garment(&mut assembly, GarmentType::Hoodie, &source, &AssemblySettings::default())?;
//! println!("{} pieces, {} seams", report.pieces_created, report.connectors_created);
//! # Ok::<(), fashionsynth_assembly::AssemblyError>(())
//! ```

mod assembly;
mod error;
pub mod layout;
pub mod orient;
mod pipeline;
pub mod position;
mod settings;
mod stitch;

pub use assembly::GarmentAssembly;
pub use error::{AssemblyError, Result};
pub use layout::arrange_pieces;
pub use orient::{orient_panel_by_edge, search_orientation, Axis};
pub use pipeline::{
    generate_custom, generate_garment, DirectorySource, GenerationReport, InMemorySource,
    SkippedPart, SvgSource, PLACEHOLDER_OUTLINE,
};
pub use position::{place_cuff, position_piece};
pub use settings::{AssemblySettings, ClothSettings};
pub use stitch::{stitch_pieces, SeamStage, SkippedSeam, StitchOutcome};
