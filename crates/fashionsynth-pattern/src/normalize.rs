//! Outline normalization.
//!
//! Orients each raw outline by role and completes half patterns. All
//! functions here are pure: they take an outline by reference and
//! return a new one.

use std::f64::consts::{FRAC_PI_2, PI};

use fashionsynth_math::{Outline, Point2};

use crate::role::PartRole;

/// Two points closer than this in X are treated as lying on the fold.
pub const FOLD_X_TOLERANCE: f64 = 5.0;

/// Number of candidate mirror axes tried over half a turn.
pub const MIRROR_TEST_ANGLES: usize = 18;

/// A reflected point this close to an outline point counts as a match.
pub const MIRROR_MATCH_DISTANCE: f64 = 50.0;

/// Minimum symmetry score for a mirror axis to be accepted.
pub const MIRROR_MIN_SCORE: f64 = 0.4;

const QUARTER_TURNS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Scale divisor for an outline whose largest coordinate magnitude is
/// `max_coord`.
pub fn scale_factor(max_coord: f64) -> f64 {
    if max_coord > 1000.0 {
        1000.0
    } else if max_coord > 100.0 {
        100.0
    } else if max_coord > 10.0 {
        10.0
    } else {
        1.0
    }
}

/// X coordinate of the straight fold edge of a half panel.
///
/// Takes the point pair (`j >= i + 2`) that is vertically aligned within
/// [`FOLD_X_TOLERANCE`] and spans the most Y. Falls back to the maximum X
/// when no pair qualifies.
pub fn find_fold_x(outline: &Outline) -> f64 {
    let pts = &outline.points;
    let mut best: Option<(f64, f64)> = None;
    for i in 0..pts.len() {
        for j in (i + 2)..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.x - b.x).abs() >= FOLD_X_TOLERANCE {
                continue;
            }
            let span = (b.y - a.y).abs();
            if best.map_or(true, |(s, _)| span > s) {
                best = Some((span, (a.x + b.x) / 2.0));
            }
        }
    }
    match best {
        Some((_, x)) => x,
        None => pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Complete a half pattern by reflecting it across its fold.
///
/// Returns `2N` points: the original `N` followed by their mirror images
/// in reverse order, so the loop closes without crossing the fold.
pub fn mirror_vertically(outline: &Outline) -> Outline {
    if outline.is_empty() {
        return Outline::default();
    }
    let fold_x = find_fold_x(outline);
    let mirrored = outline
        .points
        .iter()
        .rev()
        .map(|p| Point2::new(2.0 * fold_x - p.x, p.y));
    let points = outline.points.iter().copied().chain(mirrored).collect();
    Outline::new(points)
}

/// Stand a half panel upright and mirror it into the full panel.
///
/// The first quarter turn (in order 0, 90, 180, 270) that makes the
/// outline taller than wide is used. Without one, the unrotated outline
/// is mirrored.
pub fn orient_panel(outline: &Outline) -> Outline {
    if outline.len() >= 4 {
        for degrees in QUARTER_TURNS {
            let candidate = outline.rotated_about_centroid(degrees);
            if candidate.height() > candidate.width() {
                log::debug!("panel rotated {degrees} degrees before mirroring");
                return mirror_vertically(&candidate);
            }
        }
    }
    mirror_vertically(outline)
}

/// Lay a strip piece along X.
///
/// Chooses the first quarter turn with strictly the greatest X span.
pub fn orient_horizontal_strip(outline: &Outline) -> Outline {
    let mut best_degrees = 0.0;
    let mut best_span = 0.0;
    for degrees in QUARTER_TURNS {
        let span = outline.rotated_about_centroid(degrees).width();
        if span > best_span {
            best_span = span;
            best_degrees = degrees;
        }
    }
    log::debug!("strip rotated {best_degrees} degrees (x span {best_span:.3})");
    outline.rotated_about_centroid(best_degrees)
}

/// Candidate symmetry axis as a finite segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorLine {
    /// First endpoint.
    pub start: Point2,
    /// Second endpoint.
    pub end: Point2,
}

impl MirrorLine {
    /// Direction angle in radians.
    pub fn angle(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Reflect `p` across the infinite line through the segment.
    pub fn reflect(&self, p: &Point2) -> Point2 {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq == 0.0 {
            return *p;
        }
        let t = (p - self.start).dot(&d) / len_sq;
        let foot = self.start + d * t;
        Point2::new(2.0 * foot.x - p.x, 2.0 * foot.y - p.y)
    }
}

/// Fraction of points whose reflection lands near some outline point.
pub fn symmetry_score(points: &[Point2], line: &MirrorLine) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let matches = points
        .iter()
        .filter(|p| {
            let m = line.reflect(p);
            points
                .iter()
                .map(|q| (m - q).norm())
                .fold(f64::INFINITY, f64::min)
                < MIRROR_MATCH_DISTANCE
        })
        .count();
    matches as f64 / points.len() as f64
}

/// Find the best-scoring symmetry axis through the bounding-box center.
///
/// Returns `None` for fewer than four points or when no axis scores
/// above [`MIRROR_MIN_SCORE`].
pub fn find_mirror_line(outline: &Outline) -> Option<MirrorLine> {
    if outline.len() < 4 {
        return None;
    }
    let center = outline.bounds_center();
    let half_length = outline.width().max(outline.height()) * 2.0;

    let mut best: Option<MirrorLine> = None;
    let mut best_score = 0.0;
    for i in 0..MIRROR_TEST_ANGLES {
        let angle = i as f64 * PI / MIRROR_TEST_ANGLES as f64;
        let dir = nalgebra::Vector2::new(angle.cos(), angle.sin()) * half_length;
        let line = MirrorLine {
            start: center - dir,
            end: center + dir,
        };
        let score = symmetry_score(&outline.points, &line);
        if score > best_score {
            best_score = score;
            best = Some(line);
        }
    }
    log::trace!("best mirror score {best_score:.3}");
    best.filter(|_| best_score > MIRROR_MIN_SCORE)
}

/// Rotate the outline about the line midpoint so the line points along +Y.
pub fn align_mirror_line_vertical(outline: &Outline, line: &MirrorLine) -> Outline {
    outline.rotated_about(&line.midpoint(), FRAC_PI_2 - line.angle())
}

/// Align a sleeve's symmetry axis with Y, or leave it as is when none
/// is found.
pub fn orient_sleeve(outline: &Outline) -> Outline {
    match find_mirror_line(outline) {
        Some(line) => {
            log::debug!("sleeve mirror axis at {:.1} degrees", line.angle().to_degrees());
            align_mirror_line_vertical(outline, &line)
        }
        None => outline.clone(),
    }
}

/// Normalize a raw outline for meshing according to its role.
///
/// Cuffs, pockets and hoods pass through unchanged; their orientation
/// is settled later in the scene.
pub fn normalize_outline(outline: &Outline, role: PartRole) -> Outline {
    match role {
        PartRole::FrontPanel | PartRole::BackPanel => orient_panel(outline),
        PartRole::NeckBinding | PartRole::WaistBand => orient_horizontal_strip(outline),
        PartRole::Sleeve => orient_sleeve(outline),
        PartRole::SleeveCuff | PartRole::Pocket | PartRole::Hood => outline.clone(),
    }
}
