//! Run context of one garment generation.

use std::collections::{BTreeMap, BTreeSet};

use fashionsynth_pattern::{GarmentType, PartRole, PatternPiece};
use fashionsynth_seam::{SeamConnector, WorldMesh};

use crate::layout::arrange_pieces;
use crate::position::{place_cuff, position_piece};
use crate::settings::ClothSettings;
use crate::stitch::{stitch_pieces, SkippedSeam};

/// Pieces, connectors and physics requests of a garment.
///
/// Pieces are only ever appended during a run; [`clear`](Self::clear)
/// starts the next one.
#[derive(Debug, Clone)]
pub struct GarmentAssembly {
    /// Garment being assembled.
    pub garment: GarmentType,
    /// Pieces in creation order.
    pub pieces: Vec<PatternPiece>,
    /// Seam connectors in creation order.
    pub connectors: Vec<SeamConnector>,
    /// Cloth parameters requested per piece name.
    pub physics: BTreeMap<String, ClothSettings>,
    sleeve_counter: u32,
    unplaced: BTreeSet<String>,
}

impl GarmentAssembly {
    /// Empty assembly.
    pub fn new(garment: GarmentType) -> Self {
        Self {
            garment,
            pieces: Vec::new(),
            connectors: Vec::new(),
            physics: BTreeMap::new(),
            sleeve_counter: 0,
            unplaced: BTreeSet::new(),
        }
    }

    /// Drop everything and reset the sleeve counter.
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.connectors.clear();
        self.physics.clear();
        self.unplaced.clear();
        self.sleeve_counter = 0;
    }

    /// Sleeves added since the last clear.
    pub fn sleeve_count(&self) -> u32 {
        self.sleeve_counter
    }

    /// Position `piece` against the pieces already present and add it.
    pub fn add_piece(&mut self, mut piece: PatternPiece) {
        if piece.role == PartRole::Sleeve {
            self.sleeve_counter += 1;
        }
        if !position_piece(&mut piece, &self.pieces, self.sleeve_counter) {
            self.unplaced.insert(piece.name.clone());
        }
        log::debug!(
            "added {} at ({:.3}, {:.3}, {:.3})",
            piece.name,
            piece.mesh.location.x,
            piece.mesh.location.y,
            piece.mesh.location.z
        );
        self.pieces.push(piece);
    }

    /// Piece by scene name.
    pub fn piece(&self, name: &str) -> Option<&PatternPiece> {
        self.pieces.iter().find(|p| p.name == name)
    }

    /// First piece with `role`.
    pub fn find_role(&self, role: PartRole) -> Option<&PatternPiece> {
        self.pieces.iter().find(|p| p.role == role)
    }

    /// World snapshot of a piece.
    pub fn world_mesh(&self, name: &str) -> Option<WorldMesh> {
        self.piece(name).and_then(|p| WorldMesh::new(p.name.as_str(), &p.mesh))
    }

    /// Names of pieces still waiting for a position.
    pub fn unplaced(&self) -> impl Iterator<Item = &str> {
        self.unplaced.iter().map(String::as_str)
    }

    /// Place every cuff beside its sleeve.
    pub fn position_cuffs(&mut self) {
        let sleeves: Vec<PatternPiece> = self
            .pieces
            .iter()
            .filter(|p| p.role == PartRole::Sleeve)
            .cloned()
            .collect();
        for cuff in self.pieces.iter_mut().filter(|p| p.role == PartRole::SleeveCuff) {
            if place_cuff(cuff, &sleeves) {
                self.unplaced.remove(&cuff.name);
            }
        }
    }

    /// Attach cloth physics to a piece. Later requests for the same
    /// piece keep the first parameters.
    pub fn request_cloth(&mut self, piece: &str, cloth: &ClothSettings) {
        self.physics
            .entry(piece.to_string())
            .or_insert_with(|| cloth.clone());
    }

    /// Add a connector, requesting cloth on its pieces when its kind
    /// asks for it.
    pub fn add_connector(&mut self, connector: SeamConnector, cloth: &ClothSettings) {
        if connector.kind.requests_cloth() {
            for piece in &connector.pieces {
                self.request_cloth(piece, cloth);
            }
        }
        self.connectors.push(connector);
    }

    /// Run every seam stage and keep the connectors.
    pub fn stitch(&mut self, spacing: f64, cloth: &ClothSettings) -> Vec<SkippedSeam> {
        let outcome = stitch_pieces(&self.pieces, spacing);
        for connector in outcome.connectors {
            self.add_connector(connector, cloth);
        }
        outcome.skipped
    }

    /// Lay out the pieces the positioner could not place. Returns how
    /// many were arranged.
    pub fn arrange_unplaced(&mut self, gap: f64) -> usize {
        let garment = self.garment;
        let unplaced = std::mem::take(&mut self.unplaced);
        let mut batch: Vec<&mut PatternPiece> = self
            .pieces
            .iter_mut()
            .filter(|p| unplaced.contains(&p.name))
            .collect();
        let count = batch.len();
        arrange_pieces(&mut batch, garment, gap);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashionsynth_math::Outline;

    fn piece(name: &str, role: PartRole, instance: u32) -> PatternPiece {
        let outline = Outline::from_flat(&[0.0, 0.0, 3.0, 0.0, 3.0, 1.0, 0.0, 1.0]);
        PatternPiece::build(name, role.as_str(), role, instance, &outline).unwrap()
    }

    #[test]
    fn test_sleeve_counter_counts_and_resets() {
        let mut asm = GarmentAssembly::new(GarmentType::Tshirt);
        asm.add_piece(piece("tshirt_sleeve_1", PartRole::Sleeve, 1));
        asm.add_piece(piece("tshirt_sleeve_2", PartRole::Sleeve, 2));
        assert_eq!(asm.sleeve_count(), 2);
        let y1 = asm.pieces[0].mesh.location.y;
        let y2 = asm.pieces[1].mesh.location.y;
        assert!(y1 < 0.0 && y2 > 0.0);

        asm.clear();
        assert_eq!(asm.sleeve_count(), 0);
        assert!(asm.pieces.is_empty());
        asm.add_piece(piece("tshirt_sleeve_1", PartRole::Sleeve, 1));
        assert!(asm.pieces[0].mesh.location.y < 0.0);
    }

    #[test]
    fn test_unplaced_cuffs_until_sleeves_exist() {
        let mut asm = GarmentAssembly::new(GarmentType::Hoodie);
        asm.add_piece(piece("hoodie_sleeve_cuff_1", PartRole::SleeveCuff, 1));
        assert_eq!(asm.unplaced().collect::<Vec<_>>(), vec!["hoodie_sleeve_cuff_1"]);

        asm.position_cuffs();
        assert_eq!(asm.unplaced().count(), 1);

        asm.add_piece(piece("hoodie_sleeve_1", PartRole::Sleeve, 1));
        asm.position_cuffs();
        assert_eq!(asm.unplaced().count(), 0);
        assert_eq!(asm.arrange_unplaced(0.5), 0);
    }

    #[test]
    fn test_arrange_takes_leftovers_once() {
        let mut asm = GarmentAssembly::new(GarmentType::Hoodie);
        asm.add_piece(piece("hoodie_pocket", PartRole::Pocket, 1));
        assert_eq!(asm.arrange_unplaced(0.5), 1);
        assert_eq!(asm.unplaced().count(), 0);
        assert_eq!(asm.arrange_unplaced(0.5), 0);
    }

    #[test]
    fn test_cloth_requested_once_per_piece() {
        let mut asm = GarmentAssembly::new(GarmentType::Hoodie);
        let cloth = ClothSettings::default();
        let mut heavy = cloth.clone();
        heavy.mass = 1.0;
        asm.request_cloth("hoodie_hood_1", &cloth);
        asm.request_cloth("hoodie_hood_1", &heavy);
        assert_eq!(asm.physics.len(), 1);
        assert!((asm.physics["hoodie_hood_1"].mass - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_world_mesh_lookup() {
        let mut asm = GarmentAssembly::new(GarmentType::Tshirt);
        asm.add_piece(piece("tshirt_front_panel", PartRole::FrontPanel, 1));
        let world = asm.world_mesh("tshirt_front_panel").unwrap();
        assert!((world.location.x - 0.5).abs() < 1e-9);
        assert!(asm.world_mesh("tshirt_hood").is_none());
        assert!(asm.find_role(PartRole::FrontPanel).is_some());
    }
}
