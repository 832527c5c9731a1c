//! Error types for seam matching.

use thiserror::Error;

/// Why a seam was not created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeamError {
    /// No edges met the feature's classification rules.
    #[error("{feature} not found on {piece}")]
    FeatureNotFound {
        /// Feature that was searched for.
        feature: &'static str,
        /// Piece that was searched.
        piece: String,
    },

    /// A piece the seam joins is absent from the garment.
    #[error("missing piece: {0}")]
    MissingPiece(String),
}

impl SeamError {
    pub(crate) fn not_found(feature: &'static str, piece: &str) -> Self {
        Self::FeatureNotFound {
            feature,
            piece: piece.to_string(),
        }
    }
}

/// Result type for seam matching.
pub type Result<T> = std::result::Result<T, SeamError>;
