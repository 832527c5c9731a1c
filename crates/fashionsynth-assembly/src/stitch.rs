//! Seam stages.
//!
//! Stages run in a fixed order over world snapshots of the placed
//! pieces. A stage whose pieces are absent from the garment does
//! nothing; a stage that finds its pieces but not the features it needs
//! records a [`SkippedSeam`] and the run carries on.

use std::fmt;

use fashionsynth_pattern::{PartRole, PatternPiece};
use fashionsynth_seam::{
    cuff_horizontal_seam, find_neckline, hood_center_seam, hood_to_panel_seams,
    neck_binding_seam, panel_side_seam, pocket_seam, shoulder_seams, sleeve_cuff_seam,
    sleeve_horizontal_seam, sleeve_to_panel_seams, waistband_seam, PanelFace, SeamConnector,
    SeamError, Side, WorldMesh,
};
use serde::Serialize;

/// One step of the stitching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamStage {
    /// Hood halves to each other.
    HoodCenter,
    /// Each sleeve end to its cuff.
    SleeveCuff,
    /// Left and right side seams.
    PanelSides,
    /// Waistband to both hems.
    WaistBand,
    /// Pockets to the front panel.
    Pocket,
    /// Neck binding to both necklines.
    NeckBinding,
    /// Left and right shoulder seams.
    Shoulders,
    /// Each sleeve closed into a tube.
    SleeveTube,
    /// Each cuff closed into a ring.
    CuffRing,
    /// Hood bottoms to the necklines.
    HoodToPanel,
    /// Sleeve sides to the armholes.
    SleeveToPanel,
}

impl SeamStage {
    /// Stages in run order.
    pub const ALL: [SeamStage; 11] = [
        SeamStage::HoodCenter,
        SeamStage::SleeveCuff,
        SeamStage::PanelSides,
        SeamStage::WaistBand,
        SeamStage::Pocket,
        SeamStage::NeckBinding,
        SeamStage::Shoulders,
        SeamStage::SleeveTube,
        SeamStage::CuffRing,
        SeamStage::HoodToPanel,
        SeamStage::SleeveToPanel,
    ];

    /// Identifier used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            SeamStage::HoodCenter => "hood_center",
            SeamStage::SleeveCuff => "sleeve_cuff",
            SeamStage::PanelSides => "panel_sides",
            SeamStage::WaistBand => "waist_band",
            SeamStage::Pocket => "pocket",
            SeamStage::NeckBinding => "neck_binding",
            SeamStage::Shoulders => "shoulders",
            SeamStage::SleeveTube => "sleeve_tube",
            SeamStage::CuffRing => "cuff_ring",
            SeamStage::HoodToPanel => "hood_to_panel",
            SeamStage::SleeveToPanel => "sleeve_to_panel",
        }
    }
}

impl fmt::Display for SeamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seam that could not be built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSeam {
    /// Stage that gave up.
    pub stage: SeamStage,
    /// Why.
    pub reason: String,
}

/// Connectors and skips of one stitching pass.
#[derive(Debug, Clone, Default)]
pub struct StitchOutcome {
    /// Connectors in creation order.
    pub connectors: Vec<SeamConnector>,
    /// Seams that were skipped.
    pub skipped: Vec<SkippedSeam>,
}

impl StitchOutcome {
    fn record(&mut self, stage: SeamStage, result: fashionsynth_seam::Result<SeamConnector>) {
        self.record_all(stage, result.map(|c| vec![c]));
    }

    fn record_all(&mut self, stage: SeamStage, result: fashionsynth_seam::Result<Vec<SeamConnector>>) {
        match result {
            Ok(connectors) => {
                for c in connectors {
                    if c.is_empty() {
                        log::warn!("{stage}: {} has no stitch pairs, skipped", c.name);
                        self.skipped.push(SkippedSeam {
                            stage,
                            reason: format!("{} has no stitch pairs", c.name),
                        });
                        continue;
                    }
                    log::debug!("{stage}: created {} with {} stitches", c.name, c.len());
                    self.connectors.push(c);
                }
            }
            Err(err) => {
                log::warn!("{stage}: seam skipped, {err}");
                self.skipped.push(SkippedSeam {
                    stage,
                    reason: err.to_string(),
                });
            }
        }
    }
}

struct Placed {
    role: PartRole,
    instance: u32,
    mesh: WorldMesh,
}

struct Scene {
    pieces: Vec<Placed>,
}

impl Scene {
    fn new(pieces: &[PatternPiece]) -> Self {
        let pieces = pieces
            .iter()
            .filter_map(|p| {
                WorldMesh::new(p.name.as_str(), &p.mesh).map(|mesh| Placed {
                    role: p.role,
                    instance: p.instance,
                    mesh,
                })
            })
            .collect();
        Self { pieces }
    }

    fn all(&self, role: PartRole) -> impl Iterator<Item = &Placed> + '_ {
        self.pieces.iter().filter(move |p| p.role == role)
    }

    fn has(&self, role: PartRole) -> bool {
        self.all(role).next().is_some()
    }

    fn first(&self, role: PartRole) -> fashionsynth_seam::Result<&WorldMesh> {
        self.all(role)
            .next()
            .map(|p| &p.mesh)
            .ok_or_else(|| SeamError::MissingPiece(role.as_str().to_string()))
    }

    fn instance(&self, role: PartRole, instance: u32) -> fashionsynth_seam::Result<&WorldMesh> {
        self.all(role)
            .find(|p| p.instance == instance)
            .map(|p| &p.mesh)
            .ok_or_else(|| SeamError::MissingPiece(format!("{} {instance}", role.as_str())))
    }

    fn panels(&self) -> fashionsynth_seam::Result<(&WorldMesh, &WorldMesh)> {
        Ok((self.first(PartRole::FrontPanel)?, self.first(PartRole::BackPanel)?))
    }
}

/// Run every seam stage over `pieces`.
pub fn stitch_pieces(pieces: &[PatternPiece], spacing: f64) -> StitchOutcome {
    let scene = Scene::new(pieces);
    let mut out = StitchOutcome::default();
    for stage in SeamStage::ALL {
        run_stage(stage, &scene, spacing, &mut out);
    }
    log::info!(
        "stitching created {} connectors, skipped {}",
        out.connectors.len(),
        out.skipped.len()
    );
    out
}

fn run_stage(stage: SeamStage, scene: &Scene, spacing: f64, out: &mut StitchOutcome) {
    let has_panel = scene.has(PartRole::FrontPanel) || scene.has(PartRole::BackPanel);
    match stage {
        SeamStage::HoodCenter => {
            if scene.has(PartRole::Hood) {
                let result = scene
                    .instance(PartRole::Hood, 1)
                    .and_then(|a| Ok((a, scene.instance(PartRole::Hood, 2)?)))
                    .and_then(|(a, b)| hood_center_seam(a, b));
                out.record(stage, result);
            }
        }
        SeamStage::SleeveCuff => {
            for cuff in scene.all(PartRole::SleeveCuff) {
                let result = scene
                    .instance(PartRole::Sleeve, cuff.instance)
                    .and_then(|sleeve| sleeve_cuff_seam(sleeve, &cuff.mesh));
                out.record(stage, result);
            }
        }
        SeamStage::PanelSides => {
            if has_panel {
                match scene.panels() {
                    Ok((front, back)) => {
                        for side in Side::BOTH {
                            out.record(stage, panel_side_seam(front, back, side, spacing));
                        }
                    }
                    Err(err) => out.record(stage, Err(err)),
                }
            }
        }
        SeamStage::WaistBand => {
            for band in scene.all(PartRole::WaistBand) {
                let result = scene
                    .panels()
                    .and_then(|(front, back)| waistband_seam(&band.mesh, front, back));
                out.record(stage, result);
            }
        }
        SeamStage::Pocket => {
            for pocket in scene.all(PartRole::Pocket) {
                let result = scene
                    .first(PartRole::FrontPanel)
                    .and_then(|front| pocket_seam(&pocket.mesh, front, spacing));
                out.record(stage, result);
            }
        }
        SeamStage::NeckBinding => {
            for binding in scene.all(PartRole::NeckBinding) {
                let result = scene.panels().and_then(|(front, back)| {
                    let front_neck = find_neckline(front, PanelFace::Front)?;
                    let back_neck = find_neckline(back, PanelFace::Back)?;
                    neck_binding_seam(&binding.mesh, &front_neck, &back_neck, spacing)
                });
                out.record(stage, result);
            }
        }
        SeamStage::Shoulders => {
            if has_panel {
                let result = scene
                    .panels()
                    .and_then(|(front, back)| shoulder_seams(front, back, spacing));
                out.record_all(stage, result);
            }
        }
        SeamStage::SleeveTube => {
            for sleeve in scene.all(PartRole::Sleeve) {
                out.record(stage, sleeve_horizontal_seam(&sleeve.mesh));
            }
        }
        SeamStage::CuffRing => {
            for cuff in scene.all(PartRole::SleeveCuff) {
                out.record(stage, cuff_horizontal_seam(&cuff.mesh));
            }
        }
        SeamStage::HoodToPanel => {
            if !scene.has(PartRole::Hood) {
                return;
            }
            let necklines = scene.panels().and_then(|(front, back)| {
                Ok((
                    find_neckline(front, PanelFace::Front)?,
                    find_neckline(back, PanelFace::Back)?,
                ))
            });
            match necklines {
                Ok((front_neck, back_neck)) => {
                    for hood in scene.all(PartRole::Hood) {
                        out.record_all(stage, hood_to_panel_seams(&hood.mesh, &front_neck, &back_neck));
                    }
                }
                Err(err) => out.record(stage, Err(err)),
            }
        }
        SeamStage::SleeveToPanel => {
            for sleeve in scene.all(PartRole::Sleeve) {
                let result = scene
                    .panels()
                    .and_then(|(front, back)| sleeve_to_panel_seams(&sleeve.mesh, front, back));
                out.record_all(stage, result);
            }
        }
    }
}
