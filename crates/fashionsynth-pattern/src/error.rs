//! Error types for pattern processing.

use thiserror::Error;

/// Errors from the part catalogue and mesh builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// The outline has fewer than three points.
    #[error("outline has {found} points, at least 3 are required")]
    TooFewPoints {
        /// Number of points in the rejected outline.
        found: usize,
    },

    /// The garment type is not in the catalogue.
    #[error("unknown garment type: {0}")]
    UnknownGarment(String),

    /// The part name maps to no known role.
    #[error("unknown part name: {0}")]
    UnknownPart(String),
}

/// Result type for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
