//! Error types for SVG extraction.

use thiserror::Error;

/// Errors that can occur while extracting an outline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    /// The input was empty or whitespace.
    #[error("svg content is empty")]
    Empty,

    /// The markup is not well-formed XML.
    #[error("malformed svg markup: {0}")]
    Xml(String),

    /// A numeric attribute could not be parsed.
    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Raw attribute value.
        value: String,
    },

    /// No polygon, polyline, path, rect or circle produced coordinates.
    #[error("no drawable shape found")]
    NoShape,
}

/// Result type for SVG extraction.
pub type Result<T> = std::result::Result<T, SvgError>;
