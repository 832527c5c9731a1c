//! Piece positioner.
//!
//! Places each piece relative to the pieces built before it. Panels hang
//! at the origin facing X, sleeves stick out along Y, the hood sits on
//! top of the back panel and the pocket on the front panel above its hem.
//! Cuffs are placed in a second pass once every sleeve exists.

use std::f64::consts::{FRAC_PI_2, PI};

use fashionsynth_math::{Point3, Vec3};
use fashionsynth_pattern::{PartRole, PatternPiece, PieceMesh};

use crate::orient::{cuff_score, hood_score, search_orientation};

/// Y distance from the extreme within which a vertex belongs to a
/// sleeve side.
pub const SLEEVE_SIDE_BAND: f64 = 0.1;
/// Clearance between a sleeve and the front panel edge.
pub const SLEEVE_CLEARANCE: f64 = 0.3;
/// Sleeve offset used when no front panel exists.
pub const SLEEVE_FALLBACK_OFFSET: f64 = 1.5;
/// Clearance between hood halves and between a cuff and its sleeve.
pub const PIECE_CLEARANCE: f64 = 0.1;
/// Height of the hood above the back panel.
pub const HOOD_LIFT: f64 = 0.2;
/// Height of the pocket above the front hem.
pub const POCKET_LIFT: f64 = 0.2;

fn find_role(pieces: &[PatternPiece], role: PartRole) -> Option<&PatternPiece> {
    pieces.iter().find(|p| p.role == role)
}

fn world_y_span(mesh: &PieceMesh) -> f64 {
    mesh.world_bounds().map_or(0.0, |b| b.span().y)
}

/// Place a freshly built piece. `placed` holds the pieces built before
/// it, and `sleeve_number` is the run's count of sleeves including this
/// one.
///
/// Returns `false` when the piece still needs placing, either because a
/// counterpart is missing or because it is placed in a later pass.
pub fn position_piece(piece: &mut PatternPiece, placed: &[PatternPiece], sleeve_number: u32) -> bool {
    let mesh = &mut piece.mesh;
    match piece.role {
        PartRole::FrontPanel => {
            mesh.location.x = 0.5;
            mesh.rotation.z += FRAC_PI_2;
            true
        }
        PartRole::BackPanel => {
            mesh.location.x = -0.5;
            mesh.rotation.z += FRAC_PI_2;
            true
        }
        PartRole::NeckBinding => {
            mesh.rotation.z += FRAC_PI_2;
            mesh.location = Vec3::new(0.5, 0.0, 1.0);
            true
        }
        PartRole::WaistBand => {
            mesh.rotation.z += FRAC_PI_2;
            mesh.location = Vec3::new(0.5, 0.0, -1.0);
            true
        }
        PartRole::Sleeve => {
            place_sleeve(mesh, find_role(placed, PartRole::FrontPanel), sleeve_number);
            true
        }
        PartRole::Pocket => match find_role(placed, PartRole::FrontPanel) {
            Some(front) => place_pocket(mesh, &front.mesh),
            None => {
                log::warn!("no front panel for {}, pocket left unplaced", piece.name);
                false
            }
        },
        PartRole::Hood => {
            place_hood(mesh, find_role(placed, PartRole::BackPanel), piece.instance);
            true
        }
        PartRole::SleeveCuff => {
            if let Some((rotation, score)) = search_orientation(&mesh.vertices, cuff_score) {
                log::debug!("{} oriented with score {score:.2}", piece.name);
                mesh.rotation = rotation;
            }
            false
        }
    }
}

fn place_sleeve(mesh: &mut PieceMesh, front: Option<&PatternPiece>, n: u32) {
    let y = match n {
        1 | 2 => {
            let offset = front.map_or(SLEEVE_FALLBACK_OFFSET, |f| {
                world_y_span(&f.mesh) / 2.0 + SLEEVE_CLEARANCE
            });
            if n == 1 {
                -offset
            } else {
                offset
            }
        }
        _ => f64::from(n) * 2.0,
    };
    mesh.location = Vec3::new(0.5, y, 0.0);

    let (left, right) = side_curvatures(&mesh.vertices);
    let flip = if n == 1 { left > right } else { right > left };
    if flip {
        mesh.rotation.x = PI;
    }
    log::debug!("sleeve {n} at y {y:.3}, side curvature {left:.4}/{right:.4}, flipped {flip}");
}

/// Curvature of the vertices near the minimum and maximum Y of a sleeve.
pub fn side_curvatures(vertices: &[Point3]) -> (f64, f64) {
    let Some(min_y) = vertices.iter().map(|v| v.y).reduce(f64::min) else {
        return (0.0, 0.0);
    };
    let max_y = vertices.iter().map(|v| v.y).fold(min_y, f64::max);
    let near = |target: f64| -> Vec<Point3> {
        vertices
            .iter()
            .filter(|v| (v.y - target).abs() < SLEEVE_SIDE_BAND)
            .copied()
            .collect()
    };
    (edge_curvature(&near(min_y)), edge_curvature(&near(max_y)))
}

/// Mean XY distance of the interior points from the chord joining the
/// lowest and highest point. Fewer than three points have no curvature.
pub fn edge_curvature(points: &[Point3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.z.total_cmp(&b.z));
    let (first, last) = (sorted[0], sorted[sorted.len() - 1]);
    let dz = last.z - first.z;

    let interior = &sorted[1..sorted.len() - 1];
    let total: f64 = interior
        .iter()
        .map(|p| {
            let t = if dz.abs() > f64::EPSILON { (p.z - first.z) / dz } else { 0.0 };
            let x = first.x + t * (last.x - first.x);
            let y = first.y + t * (last.y - first.y);
            ((p.x - x).powi(2) + (p.y - y).powi(2)).sqrt()
        })
        .sum();
    total / interior.len() as f64
}

fn place_pocket(mesh: &mut PieceMesh, front: &PieceMesh) -> bool {
    let (Some(front_bounds), Some(local)) = (front.world_bounds(), mesh.local_bounds()) else {
        return false;
    };
    mesh.location = Vec3::new(
        front.location.x + 0.1,
        0.0,
        front_bounds.min.z + local.span().z / 2.0 + POCKET_LIFT,
    );

    let n = mesh.vertices.len();
    let mut longest: Option<(Vec3, f64)> = None;
    for i in 0..n {
        let d = mesh.vertices[(i + 1) % n] - mesh.vertices[i];
        let len = d.norm();
        if longest.map_or(true, |(_, l)| len > l) {
            longest = Some((d, len));
        }
    }
    if let Some((d, _)) = longest {
        mesh.rotation.z += -d.z.atan2(d.x) + FRAC_PI_2;
    }
    true
}

fn place_hood(mesh: &mut PieceMesh, back: Option<&PatternPiece>, instance: u32) {
    let Some(back) = back else {
        mesh.location = Vec3::new(-0.5, 0.0, 2.0);
        return;
    };
    if let Some((rotation, score)) = search_orientation(&mesh.vertices, hood_score) {
        log::debug!("hood {instance} oriented with score {score:.2}");
        mesh.rotation = rotation;
    }

    let back_top = back.mesh.location.z + back.mesh.local_bounds().map_or(0.0, |b| b.max.z);
    let hood_bottom = mesh.local_bounds().map_or(0.0, |b| b.min.z);
    mesh.location.x = back.mesh.location.x;
    mesh.location.z = back_top + HOOD_LIFT - hood_bottom;

    let offset = world_y_span(mesh) / 2.0 + PIECE_CLEARANCE;
    if instance == 1 {
        mesh.location.y = -offset;
    } else {
        mesh.rotation.z += PI;
        mesh.location.y = offset;
    }
}

/// Place a cuff beside the end of its sleeve: the sleeve with the same
/// instance index, or the first sleeve.
///
/// Returns `false` when there is no sleeve.
pub fn place_cuff(cuff: &mut PatternPiece, sleeves: &[PatternPiece]) -> bool {
    let sleeve = sleeves
        .iter()
        .find(|s| s.instance == cuff.instance)
        .or_else(|| sleeves.first());
    let Some(sleeve) = sleeve else {
        log::warn!("no sleeve for {}, cuff left unplaced", cuff.name);
        return false;
    };
    let (Some(sleeve_bounds), Some(cuff_bounds)) = (sleeve.mesh.world_bounds(), cuff.mesh.world_bounds())
    else {
        return false;
    };

    let offset = (sleeve_bounds.span().y + cuff_bounds.span().y) / 2.0 + PIECE_CLEARANCE;
    let y = if cuff.instance == 1 {
        sleeve_bounds.min.y - offset
    } else {
        sleeve_bounds.max.y + offset
    };
    cuff.mesh.location = Vec3::new(sleeve.mesh.location.x, y, sleeve.mesh.location.z);
    log::debug!("{} placed beside {}", cuff.name, sleeve.name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashionsynth_math::Outline;

    fn piece(name: &str, role: PartRole, instance: u32, coords: &[f64]) -> PatternPiece {
        PatternPiece::build(name, role.as_str(), role, instance, &Outline::from_flat(coords)).unwrap()
    }

    fn rect(w: f64, h: f64) -> Vec<f64> {
        vec![0.0, 0.0, w, 0.0, w, h, 0.0, h]
    }

    fn front() -> PatternPiece {
        let mut p = piece("front_panel", PartRole::FrontPanel, 1, &rect(4.0, 6.0));
        assert!(position_piece(&mut p, &[], 0));
        p
    }

    #[test]
    fn test_panels_face_x() {
        let p = front();
        assert!((p.mesh.location.x - 0.5).abs() < 1e-9);
        assert!((p.mesh.rotation.z - FRAC_PI_2).abs() < 1e-9);
        let bounds = p.mesh.world_bounds().unwrap();
        assert!(bounds.span().x < 1e-9);
    }

    #[test]
    fn test_strips_sit_above_and_below() {
        let mut band = piece("waist_band", PartRole::WaistBand, 1, &rect(8.0, 1.0));
        assert!(position_piece(&mut band, &[], 0));
        assert!((band.mesh.location.z + 1.0).abs() < 1e-9);
        let mut binding = piece("neck_binding", PartRole::NeckBinding, 1, &rect(8.0, 1.0));
        assert!(position_piece(&mut binding, &[], 0));
        assert!((binding.mesh.location.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleeves_clear_the_front_panel() {
        let placed = vec![front()];
        let width = placed[0].mesh.world_bounds().unwrap().span().y;
        let mut s1 = piece("sleeve_1", PartRole::Sleeve, 1, &rect(3.0, 5.0));
        let mut s2 = piece("sleeve_2", PartRole::Sleeve, 2, &rect(3.0, 5.0));
        position_piece(&mut s1, &placed, 1);
        position_piece(&mut s2, &placed, 2);
        assert!((s1.mesh.location.y + width / 2.0 + SLEEVE_CLEARANCE).abs() < 1e-9);
        assert!((s2.mesh.location.y - width / 2.0 - SLEEVE_CLEARANCE).abs() < 1e-9);

        let mut s3 = piece("sleeve_3", PartRole::Sleeve, 3, &rect(3.0, 5.0));
        position_piece(&mut s3, &[], 3);
        assert!((s3.mesh.location.y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleeve_without_front_uses_fallback() {
        let mut s = piece("sleeve_1", PartRole::Sleeve, 1, &rect(3.0, 5.0));
        position_piece(&mut s, &[], 1);
        assert!((s.mesh.location.y + SLEEVE_FALLBACK_OFFSET).abs() < 1e-9);
    }

    #[test]
    fn test_edge_curvature() {
        let straight = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        assert!(edge_curvature(&straight).abs() < 1e-12);
        let bent = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.5, 1.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        assert!((edge_curvature(&bent) - 0.5).abs() < 1e-12);
        assert_eq!(edge_curvature(&bent[..2]), 0.0);
    }

    #[test]
    fn test_side_curvatures_compare_ends() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.05, 1.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 3.0, 2.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let (left, right) = side_curvatures(&vertices);
        assert!((left - 0.05).abs() < 1e-12);
        assert_eq!(right, 0.0);
    }

    #[test]
    fn test_pocket_needs_front() {
        let mut pocket = piece("pocket", PartRole::Pocket, 1, &rect(2.0, 1.0));
        assert!(!position_piece(&mut pocket, &[], 0));

        let placed = vec![front()];
        assert!(position_piece(&mut pocket, &placed, 0));
        let front_min_z = placed[0].mesh.world_bounds().unwrap().min.z;
        assert!((pocket.mesh.location.x - 0.6).abs() < 1e-9);
        assert!((pocket.mesh.location.z - (front_min_z + 0.5 + POCKET_LIFT)).abs() < 1e-9);
        // Longest edge ran along X, so the pocket turns to face X.
        assert!((pocket.mesh.rotation.z - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_hood_halves_sit_on_back_panel() {
        let mut back = piece("back_panel", PartRole::BackPanel, 1, &rect(4.0, 6.0));
        position_piece(&mut back, &[], 0);
        let back_top = back.mesh.world_bounds().unwrap().max.z;
        let placed = vec![back];

        let mut h1 = piece("hood_1", PartRole::Hood, 1, &rect(2.0, 3.0));
        let mut h2 = piece("hood_2", PartRole::Hood, 2, &rect(2.0, 3.0));
        position_piece(&mut h1, &placed, 0);
        position_piece(&mut h2, &placed, 0);

        assert!(h1.mesh.location.y < 0.0 && h2.mesh.location.y > 0.0);
        assert!((h1.mesh.location.x + 0.5).abs() < 1e-9);
        let b1 = h1.mesh.world_bounds().unwrap();
        assert!(b1.min.z > back_top);
        assert!(b1.max.y < 0.0);
        assert!(h2.mesh.world_bounds().unwrap().min.y > 0.0);
    }

    #[test]
    fn test_hood_without_back_panel() {
        let mut h = piece("hood_1", PartRole::Hood, 1, &rect(2.0, 3.0));
        assert!(position_piece(&mut h, &[], 0));
        assert_eq!(h.mesh.location, Vec3::new(-0.5, 0.0, 2.0));
    }

    #[test]
    fn test_cuffs_hang_beside_sleeves() {
        let placed = vec![front()];
        let mut s1 = piece("sleeve_1", PartRole::Sleeve, 1, &rect(3.0, 5.0));
        let mut s2 = piece("sleeve_2", PartRole::Sleeve, 2, &rect(3.0, 5.0));
        position_piece(&mut s1, &placed, 1);
        position_piece(&mut s2, &placed, 2);
        let sleeves = vec![s1, s2];

        let mut c1 = piece("sleeve_cuff_1", PartRole::SleeveCuff, 1, &rect(3.0, 1.0));
        let mut c2 = piece("sleeve_cuff_2", PartRole::SleeveCuff, 2, &rect(3.0, 1.0));
        assert!(!position_piece(&mut c1, &placed, 0));
        assert!(!position_piece(&mut c2, &placed, 0));
        assert!(place_cuff(&mut c1, &sleeves));
        assert!(place_cuff(&mut c2, &sleeves));

        let s1b = sleeves[0].mesh.world_bounds().unwrap();
        let c1b = c1.mesh.world_bounds().unwrap();
        assert!(c1b.max.y < s1b.min.y);
        let s2b = sleeves[1].mesh.world_bounds().unwrap();
        assert!(c2.mesh.world_bounds().unwrap().min.y > s2b.max.y);
        assert!((c1.mesh.location.x - sleeves[0].mesh.location.x).abs() < 1e-9);
    }

    #[test]
    fn test_cuff_without_sleeve() {
        let mut c = piece("sleeve_cuff_1", PartRole::SleeveCuff, 1, &rect(3.0, 1.0));
        assert!(!place_cuff(&mut c, &[]));
    }
}
