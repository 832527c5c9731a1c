//! fashionsynth CLI - garment generation from local pattern SVGs
//!
//! Builds, places and stitches the pieces of a garment and prints the
//! generation report as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use fashionsynth_assembly::{
    generate_custom, generate_garment, AssemblySettings, ClothSettings, DirectorySource,
    GarmentAssembly, GenerationReport,
};
use fashionsynth_pattern::{garment_defaults, GarmentType, PatternPiece};
use fashionsynth_seam::SeamConnector;

#[derive(Parser)]
#[command(name = "fashionsynth")]
#[command(about = "Generate 3D garment pieces and seams from pattern SVGs", long_about = None)]
struct Cli {
    /// Log progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every positioning and seam decision
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the parts of a garment
    Parts {
        /// Garment type (hoodie, tshirt)
        garment: GarmentType,
    },
    /// Print the outline extracted from an SVG file
    Extract {
        /// Input .svg file
        input: PathBuf,
    },
    /// Generate a garment from a directory of `{part}.svg` files
    Generate {
        /// Garment type (hoodie, tshirt)
        garment: GarmentType,
        /// Directory holding the pattern SVGs
        dir: PathBuf,
        /// Settings TOML file
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Write pieces and connectors as JSON to this file
        #[arg(long)]
        scene: Option<PathBuf>,
    },
    /// Build and place pieces from individual SVG files, without seams
    Custom {
        /// Garment type (hoodie, tshirt)
        garment: GarmentType,
        /// Part file as `part=path.svg`, repeatable
        #[arg(short, long = "part", value_parser = parse_part, required = true)]
        parts: Vec<(String, PathBuf)>,
        /// Settings TOML file
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Write pieces as JSON to this file
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

fn parse_part(arg: &str) -> Result<(String, PathBuf), String> {
    let (part, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected part=path, got {arg:?}"))?;
    if part.is_empty() || path.is_empty() {
        return Err(format!("expected part=path, got {arg:?}"));
    }
    Ok((part.to_string(), PathBuf::from(path)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Parts { garment } => show_parts(garment),
        Commands::Extract { input } => extract(&input)?,
        Commands::Generate {
            garment,
            dir,
            settings,
            scene,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let source = DirectorySource::new(dir);
            let mut assembly = GarmentAssembly::new(garment);
            let report = generate_garment(&mut assembly, garment, &source, &settings)?;
            finish(&assembly, &report, scene.as_deref())?;
        }
        Commands::Custom {
            garment,
            parts,
            settings,
            scene,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let files: BTreeMap<String, PathBuf> = parts.into_iter().collect();
            let mut assembly = GarmentAssembly::new(garment);
            let report = generate_custom(&mut assembly, garment, &files, &settings)
                .context("custom generation failed")?;
            finish(&assembly, &report, scene.as_deref())?;
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<AssemblySettings> {
    match path {
        Some(path) => AssemblySettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(AssemblySettings::default()),
    }
}

fn show_parts(garment: GarmentType) {
    println!("{garment}:");
    for part in garment_defaults(garment) {
        println!(
            "  {:<14} x{}  {:<14} {}",
            part.name, part.quantity, part.display_name, part.description
        );
        println!("  {:<14}     {}", "", part.url());
    }
}

fn extract(input: &Path) -> Result<()> {
    let svg = fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let outline = fashionsynth_svg::try_extract_outline(&svg)
        .with_context(|| format!("no outline in {}", input.display()))?;
    println!("{}", serde_json::to_string(&outline.to_flat())?);
    Ok(())
}

#[derive(Serialize)]
struct Scene<'a> {
    pieces: &'a [PatternPiece],
    connectors: &'a [SeamConnector],
    physics: &'a BTreeMap<String, ClothSettings>,
}

fn finish(assembly: &GarmentAssembly, report: &GenerationReport, scene: Option<&Path>) -> Result<()> {
    if let Some(path) = scene {
        let scene = Scene {
            pieces: &assembly.pieces,
            connectors: &assembly.connectors,
            physics: &assembly.physics,
        };
        let json = serde_json::to_string_pretty(&scene)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote scene to {}", path.display());
    }
    println!("{}", report.to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_part() {
        let (part, path) = parse_part("front_panel=patterns/front.svg").unwrap();
        assert_eq!(part, "front_panel");
        assert_eq!(path, PathBuf::from("patterns/front.svg"));
        assert!(parse_part("front_panel").is_err());
        assert!(parse_part("=front.svg").is_err());
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from(["fashionsynth", "-v", "generate", "t-shirt", "patterns"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate { garment, dir, .. } => {
                assert_eq!(garment, GarmentType::Tshirt);
                assert_eq!(dir, PathBuf::from("patterns"));
            }
            _ => panic!("expected generate"),
        }
        assert!(Cli::try_parse_from(["fashionsynth", "parts", "jacket"]).is_err());
    }
}
