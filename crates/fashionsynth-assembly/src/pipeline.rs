//! Generation pipeline: fetch, extract, build, position, stitch, arrange.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use fashionsynth_math::Outline;
use fashionsynth_pattern::{garment_defaults, GarmentType, PartDefinition, PartRole, PatternPiece};
use fashionsynth_svg::extract_outline;
use serde::Serialize;

use crate::assembly::GarmentAssembly;
use crate::error::{AssemblyError, Result};
use crate::settings::AssemblySettings;
use crate::stitch::SkippedSeam;

/// Test rectangle substituted for an empty front panel.
pub const PLACEHOLDER_OUTLINE: [f64; 8] = [0.0, 0.0, 100.0, 0.0, 100.0, 150.0, 0.0, 150.0];

/// Where pattern SVGs come from.
pub trait SvgSource {
    /// SVG markup for a part, or `None` when the source has none.
    fn fetch(&self, part: &str) -> Result<Option<String>>;
}

/// SVG files named `{part}.svg` in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File a part is read from.
    pub fn path_for(&self, part: &str) -> PathBuf {
        self.root.join(format!("{part}.svg"))
    }
}

impl SvgSource for DirectorySource {
    fn fetch(&self, part: &str) -> Result<Option<String>> {
        let path = self.path_for(part);
        if !path.is_file() {
            return Ok(None);
        }
        read_svg(&path).map(Some)
    }
}

/// SVG markup held in memory, keyed by part name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    svgs: HashMap<String, String>,
}

impl InMemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the markup of a part.
    pub fn insert(&mut self, part: impl Into<String>, svg: impl Into<String>) {
        self.svgs.insert(part.into(), svg.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, part: impl Into<String>, svg: impl Into<String>) -> Self {
        self.insert(part, svg);
        self
    }
}

impl SvgSource for InMemorySource {
    fn fetch(&self, part: &str) -> Result<Option<String>> {
        Ok(self.svgs.get(part).cloned())
    }
}

fn read_svg(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| AssemblyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A part that produced no piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPart {
    /// Part or instance name.
    pub part: String,
    /// Why.
    pub reason: String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Garment generated.
    pub garment: GarmentType,
    /// Number of pieces built.
    pub pieces_created: usize,
    /// Names of the pieces built.
    pub pieces: Vec<String>,
    /// Parts that were skipped.
    pub skipped_parts: Vec<SkippedPart>,
    /// Number of seam connectors built.
    pub connectors_created: usize,
    /// Names of the connectors built.
    pub connectors: Vec<String>,
    /// Seams that were skipped.
    pub skipped_seams: Vec<SkippedSeam>,
    /// Pieces moved into the flat layout.
    pub arranged: usize,
    /// Pieces carrying cloth physics.
    pub cloth_pieces: usize,
}

impl GenerationReport {
    fn new(garment: GarmentType) -> Self {
        Self {
            garment,
            pieces_created: 0,
            pieces: Vec::new(),
            skipped_parts: Vec::new(),
            connectors_created: 0,
            connectors: Vec::new(),
            skipped_seams: Vec::new(),
            arranged: 0,
            cloth_pieces: 0,
        }
    }

    fn skip(&mut self, part: &str, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("skipping {part}: {reason}");
        self.skipped_parts.push(SkippedPart {
            part: part.to_string(),
            reason,
        });
    }

    fn finish(&mut self, assembly: &GarmentAssembly) {
        self.pieces = assembly.pieces.iter().map(|p| p.name.clone()).collect();
        self.pieces_created = self.pieces.len();
        self.connectors = assembly.connectors.iter().map(|c| c.name.clone()).collect();
        self.connectors_created = self.connectors.len();
        self.cloth_pieces = assembly.physics.len();
    }

    /// Pretty JSON form of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build every instance of `part` from its SVG markup.
fn build_part(
    assembly: &mut GarmentAssembly,
    part: &PartDefinition,
    svg: &str,
    settings: &AssemblySettings,
    report: &mut GenerationReport,
) {
    let mut outline = extract_outline(svg);
    if outline.is_empty() && part.role == PartRole::FrontPanel && settings.placeholder_front_panel {
        log::info!("using placeholder outline for {}", part.name);
        outline = Outline::from_flat(&PLACEHOLDER_OUTLINE);
    }
    if outline.is_empty() {
        report.skip(&part.name, "no drawable outline");
        return;
    }

    for index in 1..=part.quantity {
        let name = part.instance_name(assembly.garment, index);
        match PatternPiece::build(name.as_str(), part.name.as_str(), part.role, index, &outline) {
            Ok(piece) => {
                log::info!("created {name} with {} vertices", piece.mesh.vertices.len());
                assembly.add_piece(piece);
            }
            Err(err) => report.skip(&name, err.to_string()),
        }
    }
}

/// Generate a garment from its built-in part list.
///
/// The assembly is cleared first. Missing or unusable SVGs skip their
/// part and the run goes on; only invalid settings fail.
pub fn generate_garment(
    assembly: &mut GarmentAssembly,
    garment: GarmentType,
    source: &dyn SvgSource,
    settings: &AssemblySettings,
) -> Result<GenerationReport> {
    settings.validate()?;
    assembly.clear();
    assembly.garment = garment;
    let mut report = GenerationReport::new(garment);
    log::info!("generating {garment}");

    for part in garment_defaults(garment) {
        let svg = match source.fetch(&part.name) {
            Ok(svg) => svg.unwrap_or_default(),
            Err(err) => {
                report.skip(&part.name, err.to_string());
                continue;
            }
        };
        build_part(assembly, &part, &svg, settings, &mut report);
    }

    assembly.position_cuffs();
    report.skipped_seams = assembly.stitch(settings.stitch_spacing, &settings.cloth);
    if settings.arrange_unplaced {
        report.arranged = assembly.arrange_unplaced(settings.layout_gap);
    }
    report.finish(assembly);
    log::info!(
        "{garment}: {} pieces, {} connectors",
        report.pieces_created,
        report.connectors_created
    );
    Ok(report)
}

fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Generate a garment from user-supplied SVG files keyed by part name.
///
/// Pieces are built and placed but not stitched. Parts without a file
/// are left out.
///
/// # Errors
///
/// Fails when a path is not an `.svg` file, when the settings are
/// invalid, or with [`AssemblyError::NoPiecesCreated`] when no piece
/// could be built.
pub fn generate_custom(
    assembly: &mut GarmentAssembly,
    garment: GarmentType,
    files: &BTreeMap<String, PathBuf>,
    settings: &AssemblySettings,
) -> Result<GenerationReport> {
    settings.validate()?;
    if let Some((part, path)) = files.iter().find(|(_, path)| !is_svg_path(path)) {
        return Err(AssemblyError::InvalidSource {
            part: part.clone(),
            path: path.clone(),
        });
    }
    assembly.clear();
    assembly.garment = garment;
    let mut report = GenerationReport::new(garment);

    let parts = garment_defaults(garment);
    for name in files.keys() {
        if !parts.iter().any(|p| &p.name == name) {
            report.skip(name, format!("not a {garment} part"));
        }
    }
    for part in &parts {
        let Some(path) = files.get(&part.name) else {
            continue;
        };
        match read_svg(path) {
            Ok(svg) => build_part(assembly, part, &svg, settings, &mut report),
            Err(err) => report.skip(&part.name, err.to_string()),
        }
    }
    if assembly.pieces.is_empty() {
        return Err(AssemblyError::NoPiecesCreated);
    }

    if settings.arrange_unplaced {
        report.arranged = assembly.arrange_unplaced(settings.layout_gap);
    }
    report.finish(assembly);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect x="0" y="0" width="100" height="150"/></svg>"#;

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new().with("pocket", RECT);
        assert!(source.fetch("pocket").unwrap().is_some());
        assert!(source.fetch("hood").unwrap().is_none());
    }

    #[test]
    fn test_directory_source_missing_file() {
        let source = DirectorySource::new("/nonexistent/patterns");
        assert_eq!(source.path_for("hood"), PathBuf::from("/nonexistent/patterns/hood.svg"));
        assert!(source.fetch("hood").unwrap().is_none());
    }

    #[test]
    fn test_placeholder_front_panel() {
        let settings = AssemblySettings {
            placeholder_front_panel: true,
            ..AssemblySettings::default()
        };
        let mut asm = GarmentAssembly::new(GarmentType::Tshirt);
        let report = generate_garment(&mut asm, GarmentType::Tshirt, &InMemorySource::new(), &settings).unwrap();
        assert_eq!(report.pieces, vec!["tshirt_front_panel".to_string()]);
        assert_eq!(asm.pieces[0].mesh.vertices.len(), 8);
        assert_eq!(report.skipped_parts.len(), 3);
    }

    #[test]
    fn test_empty_source_builds_nothing() {
        let mut asm = GarmentAssembly::new(GarmentType::Hoodie);
        let report =
            generate_garment(&mut asm, GarmentType::Hoodie, &InMemorySource::new(), &AssemblySettings::default())
                .unwrap();
        assert_eq!(report.pieces_created, 0);
        assert_eq!(report.skipped_parts.len(), 7);
        assert!(report.skipped_seams.is_empty());
    }

    #[test]
    fn test_invalid_settings_fail() {
        let settings = AssemblySettings {
            stitch_spacing: 0.0,
            ..AssemblySettings::default()
        };
        let mut asm = GarmentAssembly::new(GarmentType::Hoodie);
        let err = generate_garment(&mut asm, GarmentType::Hoodie, &InMemorySource::new(), &settings).unwrap_err();
        assert!(matches!(err, AssemblyError::Settings(_)));
    }

    #[test]
    fn test_custom_rejects_non_svg() {
        let mut files = BTreeMap::new();
        files.insert("front_panel".to_string(), PathBuf::from("front.png"));
        let mut asm = GarmentAssembly::new(GarmentType::Tshirt);
        let err = generate_custom(&mut asm, GarmentType::Tshirt, &files, &AssemblySettings::default()).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidSource { .. }));
    }

    #[test]
    fn test_custom_without_readable_files() {
        let mut files = BTreeMap::new();
        files.insert("front_panel".to_string(), PathBuf::from("/nonexistent/front.SVG"));
        let mut asm = GarmentAssembly::new(GarmentType::Tshirt);
        let err = generate_custom(&mut asm, GarmentType::Tshirt, &files, &AssemblySettings::default()).unwrap_err();
        assert!(matches!(err, AssemblyError::NoPiecesCreated));
    }

    #[test]
    fn test_report_serializes() {
        let report = GenerationReport::new(GarmentType::Hoodie);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"garment\": \"hoodie\""));
    }
}
