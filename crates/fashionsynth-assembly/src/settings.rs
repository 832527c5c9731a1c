//! Run settings.
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes:
//!
//! ```toml
//! layout_gap = 0.8
//!
//! [cloth]
//! mass = 0.4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};

/// Cloth physics parameters attached to every piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothSettings {
    /// Solver steps per frame.
    pub quality: u32,
    /// Vertex mass (kg).
    pub mass: f64,
    /// Tension stiffness.
    pub tension_stiffness: f64,
    /// Compression stiffness.
    pub compression_stiffness: f64,
    /// Shear stiffness.
    pub shear_stiffness: f64,
    /// Bending stiffness.
    pub bending_stiffness: f64,
    /// Pull sewing edges together during simulation.
    pub use_sewing_springs: bool,
    /// Maximum sewing force.
    pub sewing_force_max: f64,
}

impl Default for ClothSettings {
    fn default() -> Self {
        Self {
            quality: 5,
            mass: 0.3,
            tension_stiffness: 15.0,
            compression_stiffness: 15.0,
            shear_stiffness: 5.0,
            bending_stiffness: 0.5,
            use_sewing_springs: true,
            sewing_force_max: 0.5,
        }
    }
}

impl ClothSettings {
    /// Check that the parameters are usable by a cloth solver.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.quality == 0 {
            return Err("Cloth quality must be at least 1".into());
        }
        if self.mass <= 0.0 {
            return Err("Cloth mass must be positive".into());
        }
        let stiffness = [
            ("Tension", self.tension_stiffness),
            ("Compression", self.compression_stiffness),
            ("Shear", self.shear_stiffness),
            ("Bending", self.bending_stiffness),
        ];
        for (label, value) in stiffness {
            if value < 0.0 {
                return Err(format!("{label} stiffness must not be negative"));
            }
        }
        if self.sewing_force_max < 0.0 {
            return Err("Sewing force must not be negative".into());
        }
        Ok(())
    }
}

/// Settings for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Cloth parameters for every piece.
    pub cloth: ClothSettings,
    /// Replace an empty front panel outline with a test rectangle.
    pub placeholder_front_panel: bool,
    /// Lay out pieces the positioner could not place.
    pub arrange_unplaced: bool,
    /// Gap between pieces in the flat layout.
    pub layout_gap: f64,
    /// Spacing between stitches on length-driven seams.
    pub stitch_spacing: f64,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            cloth: ClothSettings::default(),
            placeholder_front_panel: false,
            arrange_unplaced: true,
            layout_gap: 0.5,
            stitch_spacing: fashionsynth_seam::STITCH_SPACING,
        }
    }
}

impl AssemblySettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded settings from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        self.cloth.validate().map_err(AssemblyError::Settings)?;
        if self.layout_gap < 0.0 {
            return Err(AssemblyError::Settings("Layout gap must not be negative".into()));
        }
        if self.stitch_spacing <= 0.0 {
            return Err(AssemblyError::Settings("Stitch spacing must be positive".into()));
        }
        Ok(())
    }
}
