use fashionsynth_math::Outline;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mesh::{build_mesh, PieceMesh};
use crate::normalize::{normalize_outline, scale_factor};
use crate::role::PartRole;

/// One instance of a garment part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPiece {
    /// Scene name, e.g. `hoodie_sleeve_2`.
    pub name: String,
    /// Part name from the garment definition.
    pub part_name: String,
    /// Resolved role.
    pub role: PartRole,
    /// Instance index, starting at 1.
    pub instance: u32,
    /// Normalized outline in pattern coordinates.
    pub outline: Outline,
    /// Divisor applied to pattern coordinates.
    pub scale: f64,
    /// Built mesh.
    pub mesh: PieceMesh,
}

impl PatternPiece {
    /// Normalize `raw`, pick its scale and build its mesh.
    ///
    /// # Errors
    ///
    /// Fails when the normalized outline is too small to mesh.
    pub fn build(
        name: impl Into<String>,
        part_name: impl Into<String>,
        role: PartRole,
        instance: u32,
        raw: &Outline,
    ) -> Result<Self> {
        let outline = normalize_outline(raw, role);
        let scale = scale_factor(outline.max_abs_coord());
        let mesh = build_mesh(&outline, role, scale)?;
        Ok(Self {
            name: name.into(),
            part_name: part_name.into(),
            role,
            instance,
            outline,
            scale,
            mesh,
        })
    }
}
