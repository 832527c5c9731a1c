//! Flat pattern layout for pieces the positioner could not place.
//!
//! Pieces are laid face up on a grid, one cell per part, rows running
//! towards -Z. The arranged batch is centred on the origin.

use std::f64::consts::FRAC_PI_2;

use fashionsynth_math::Vec3;
use fashionsynth_pattern::{GarmentType, PartRole, PatternPiece};

/// Offset between duplicates sharing a grid cell.
pub const DUPLICATE_OFFSET: f64 = 0.2;
/// Row used for pieces without a layout rule.
pub const FALLBACK_ROW: f64 = 3.0;

/// Grid cell of a layout key as `(key, row, column)`.
pub type LayoutRule = (&'static str, f64, f64);

const HOODIE_LAYOUT: [LayoutRule; 8] = [
    ("front_panel", 0.0, 1.0),
    ("back_panel", 0.0, 2.0),
    ("sleeve_1", 0.0, 0.0),
    ("sleeve_2", 0.0, 3.0),
    ("hood", 1.0, 1.0),
    ("pocket", 1.0, 2.0),
    ("waist_band", 2.0, 1.5),
    ("sleeve_cuff", 2.0, 0.0),
];

const TSHIRT_LAYOUT: [LayoutRule; 5] = [
    ("front_panel", 0.0, 1.0),
    ("back_panel", 0.0, 2.0),
    ("sleeve_1", 0.0, 0.0),
    ("sleeve_2", 0.0, 3.0),
    ("neck_binding", 1.0, 1.5),
];

/// Layout rules of a garment.
pub fn layout_rules(garment: GarmentType) -> &'static [LayoutRule] {
    match garment {
        GarmentType::Hoodie => &HOODIE_LAYOUT,
        GarmentType::Tshirt => &TSHIRT_LAYOUT,
    }
}

/// Layout key of a piece: its role, with sleeves kept apart by instance.
pub fn layout_key(piece: &PatternPiece) -> String {
    match piece.role {
        PartRole::Sleeve => format!("sleeve_{}", piece.instance),
        role => role.as_str().to_string(),
    }
}

/// Lay `pieces` out on the garment's grid, `gap` apart.
pub fn arrange_pieces(pieces: &mut [&mut PatternPiece], garment: GarmentType, gap: f64) {
    if pieces.is_empty() {
        return;
    }

    let mut max_width: f64 = 0.0;
    let mut max_depth: f64 = 0.0;
    for p in pieces.iter() {
        if let Some(b) = p.mesh.world_bounds() {
            let span = b.span();
            max_width = max_width.max(span.x);
            max_depth = max_depth.max(span.z);
        }
    }
    let (sx, sz) = (max_width + gap, max_depth + gap);

    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (i, p) in pieces.iter().enumerate() {
        let key = layout_key(p);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(i),
            None => groups.push((key, vec![i])),
        }
    }

    let rules = layout_rules(garment);
    let mut fallback = 0usize;
    for (key, members) in &groups {
        let (x, z) = match rules.iter().find(|(k, _, _)| *k == key.as_str()) {
            Some(&(_, row, col)) => (col * sx, -row * sz),
            None => {
                let x = fallback as f64 * sx * 0.5;
                fallback += 1;
                log::debug!("no layout rule for {key}, placed in the spare row");
                (x, -FALLBACK_ROW * sz)
            }
        };
        for (i, &idx) in members.iter().enumerate() {
            let shift = DUPLICATE_OFFSET * i as f64;
            let mesh = &mut pieces[idx].mesh;
            mesh.location = Vec3::new(x + shift, 0.0, z + shift);
            mesh.rotation = Vec3::new(FRAC_PI_2, 0.0, 0.0);
        }
    }

    let n = pieces.len() as f64;
    let mean_x = pieces.iter().map(|p| p.mesh.location.x).sum::<f64>() / n;
    let mean_z = pieces.iter().map(|p| p.mesh.location.z).sum::<f64>() / n;
    for p in pieces.iter_mut() {
        p.mesh.location.x -= mean_x;
        p.mesh.location.z -= mean_z;
    }
    log::info!("arranged {} pieces in the flat layout", pieces.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashionsynth_math::Outline;

    fn piece(role: PartRole, instance: u32) -> PatternPiece {
        let outline = Outline::from_flat(&[0.0, 0.0, 2.0, 0.0, 2.0, 1.0, 0.0, 1.0]);
        PatternPiece::build(role.as_str(), role.as_str(), role, instance, &outline).unwrap()
    }

    #[test]
    fn test_layout_key_separates_sleeves() {
        assert_eq!(layout_key(&piece(PartRole::Sleeve, 2)), "sleeve_2");
        assert_eq!(layout_key(&piece(PartRole::SleeveCuff, 2)), "sleeve_cuff");
    }

    #[test]
    fn test_arrange_uses_grid_and_recenters() {
        let mut pocket = piece(PartRole::Pocket, 1);
        let mut cuff1 = piece(PartRole::SleeveCuff, 1);
        let mut cuff2 = piece(PartRole::SleeveCuff, 2);
        {
            let mut batch = vec![&mut pocket, &mut cuff1, &mut cuff2];
            arrange_pieces(&mut batch, GarmentType::Hoodie, 0.5);
        }
        let locations = [pocket.mesh.location, cuff1.mesh.location, cuff2.mesh.location];
        let mean_x: f64 = locations.iter().map(|l| l.x).sum::<f64>() / 3.0;
        let mean_z: f64 = locations.iter().map(|l| l.z).sum::<f64>() / 3.0;
        assert!(mean_x.abs() < 1e-9 && mean_z.abs() < 1e-9);

        // Both cuffs share a cell, the second nudged by the duplicate offset.
        let d = cuff2.mesh.location - cuff1.mesh.location;
        assert!((d.x - DUPLICATE_OFFSET).abs() < 1e-9);
        assert!((d.z - DUPLICATE_OFFSET).abs() < 1e-9);

        // Pocket cell (1, 2) against cuff cell (2, 0): spacing 2.5 by 1.5.
        let d = pocket.mesh.location - cuff1.mesh.location;
        assert!((d.x - 5.0).abs() < 1e-9);
        assert!((d.z - 1.5).abs() < 1e-9);
        assert!((pocket.mesh.rotation.x - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_unruled_pieces_go_to_spare_row() {
        let mut hood = piece(PartRole::Hood, 1);
        let mut pocket = piece(PartRole::Pocket, 1);
        {
            let mut batch = vec![&mut hood, &mut pocket];
            arrange_pieces(&mut batch, GarmentType::Tshirt, 0.0);
        }
        let d = pocket.mesh.location - hood.mesh.location;
        assert!((d.x - 1.0).abs() < 1e-9);
        assert!(d.z.abs() < 1e-9);
    }

    #[test]
    fn test_arrange_nothing() {
        arrange_pieces(&mut [], GarmentType::Hoodie, 0.5);
    }
}
