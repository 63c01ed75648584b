//! Headless war2edit
//!
//! Creates a map from a config file, applies paint strokes and saves the
//! composited map as a PNG.
//!
//! Usage:
//!   war2edit --config map.toml --output map.png \
//!     --paint 10,10,dark_water --paint 12,10,human_wall \
//!     --report strokes.json

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;
use war2edit::{BitmapError, ConfigError, Editor, EditorConfig, Era, PaintReport, TextureDictionary};
use war2edit_tile::{Terrain, TerrainBrush, TerrainKind, Wall, WallRace, WallState};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bitmap(#[from] BitmapError),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Framebuffer does not match its {0}x{1} size")]
    Framebuffer(u32, u32),
}

/// One `--paint` argument
#[derive(Debug, Clone, Copy)]
struct Stroke {
    x: u32,
    y: u32,
    brush: TerrainBrush,
}

/// Render a Warcraft II map with autotiled terrain
#[derive(Parser, Debug)]
#[command(name = "war2edit", version)]
struct Args {
    /// Editor config (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PNG to write the map to
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,

    /// Paint stroke as X,Y,TERRAIN (repeatable)
    #[arg(short, long = "paint", value_parser = parse_stroke)]
    paint: Vec<Stroke>,

    /// Write the paint reports as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured era (forest, winter, wasteland, swamp)
    #[arg(long, value_parser = parse_era)]
    era: Option<Era>,
}

fn parse_era(s: &str) -> Result<Era, String> {
    Era::ALL
        .into_iter()
        .find(|era| era.name() == s)
        .ok_or_else(|| format!("unknown era '{s}'"))
}

fn parse_brush(s: &str) -> Result<TerrainBrush, String> {
    if s == "randomize" {
        return Ok(TerrainBrush::Randomize);
    }
    if let Some(kind) = TerrainKind::ALL.into_iter().find(|kind| kind.name() == s) {
        return Ok(TerrainBrush::Terrain(Terrain::Plain(kind)));
    }
    let wall = match s {
        "human_wall" => Wall::new(WallRace::Human, WallState::Closed),
        "human_wall_open" => Wall::new(WallRace::Human, WallState::Open),
        "orc_wall" => Wall::new(WallRace::Orc, WallState::Closed),
        "orc_wall_open" => Wall::new(WallRace::Orc, WallState::Open),
        _ => return Err(format!("unknown terrain '{s}'")),
    };
    Ok(TerrainBrush::Terrain(Terrain::Wall(wall)))
}

fn parse_stroke(s: &str) -> Result<Stroke, String> {
    let mut parts = s.splitn(3, ',');
    let (Some(x), Some(y), Some(terrain)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected X,Y,TERRAIN, got '{s}'"));
    };
    let x = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Stroke {
        x,
        y,
        brush: parse_brush(terrain.trim())?,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(era) = args.era {
        config.map.era = era;
    }

    let rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let era = config.map.resolve_era();
    let textures = TextureDictionary::procedural(era, config.tiles.width, config.tiles.height);
    let mut editor = Editor::new(&config, textures, rng)?;

    let mut reports: Vec<PaintReport> = Vec::with_capacity(args.paint.len());
    for stroke in &args.paint {
        let report = editor.paint(stroke.x, stroke.y, stroke.brush)?;
        tracing::info!(
            "Painted ({}, {}): {} tiles written, {} neighbors kept",
            stroke.x,
            stroke.y,
            report.writes.len(),
            report.rejected().count()
        );
        reports.push(report);
    }

    let (width, height) = editor.bitmap().pixel_size();
    let image = image::RgbaImage::from_raw(width, height, editor.bitmap().pixels().to_vec())
        .ok_or(CliError::Framebuffer(width, height))?;
    image.save(&args.output)?;
    tracing::info!("Saved {}x{} map to {}", width, height, args.output.display());

    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&reports)?)?;
        tracing::info!("Wrote {} paint reports to {}", reports.len(), path.display());
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
