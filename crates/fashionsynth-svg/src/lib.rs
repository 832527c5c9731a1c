#![warn(missing_docs)]

//! Pattern-piece outline extraction from SVG files.
//!
//! Each pattern SVG is expected to carry one drawable outline. The
//! extractor walks the document in order, skips decorative page borders,
//! and turns the first usable polygon, polyline, path, rect or circle
//! into an [`Outline`](fashionsynth_math::Outline).
//!
//! # Example
//!
//! ```
//! use fashionsynth_svg::extract_outline;
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
//!     <rect x="0" y="0" width="100" height="150"/>
//! </svg>"#;
//! let outline = extract_outline(svg);
//! assert_eq!(outline.len(), 4);
//! ```

mod error;
mod extract;
pub mod path_data;

pub use error::{Result, SvgError};
pub use extract::{extract_outline, try_extract_outline, CIRCLE_SEGMENTS, MIN_SHAPE_POINTS};
