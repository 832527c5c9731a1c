use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a garment.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A piece could not be built.
    #[error(transparent)]
    Pattern(#[from] fashionsynth_pattern::PatternError),

    /// An SVG could not be read as an outline.
    #[error(transparent)]
    Svg(#[from] fashionsynth_svg::SvgError),

    /// The settings file is not valid TOML for [`AssemblySettings`](crate::AssemblySettings).
    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Settings are out of range.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// No piece of the run could be built.
    #[error("no pattern pieces were created")]
    NoPiecesCreated,

    /// A custom source is not an SVG file.
    #[error("source for {part} is not an .svg file: {}", path.display())]
    InvalidSource {
        /// Part the file was given for.
        part: String,
        /// Offending path.
        path: PathBuf,
    },
}

/// Result alias for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;
