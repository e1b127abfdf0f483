//! Command-line front end for the texture batch generator.
//!
//! ```text
//! pattern_textures -n 100 -i 0 -d output/ -t all -r 500
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pattern_textures::{BatchConfig, BatchOrchestrator, ImageExt, PatternSelector};

#[derive(Debug, Parser)]
#[command(
    name = "pattern_textures",
    version,
    about = "Generate synthetic textures and material scripts"
)]
struct Args {
    /// Number of textures to generate per pattern kind
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Index of the first texture
    #[arg(short = 'i', long)]
    start: Option<u32>,

    /// Output directory; `textures/` and `scripts/` are created inside
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Texture type: all, flat, chess, gradient or perlin
    #[arg(short = 't', long = "type")]
    pattern: Option<String>,

    /// Image side length in pixels
    #[arg(short = 'r', long)]
    resolution: Option<u32>,

    /// Image file extension (png, jpg, bmp, tga)
    #[arg(long)]
    ext: Option<ImageExt>,

    /// Root seed for a reproducible batch
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads; 1 generates strictly in order
    #[arg(long)]
    threads: Option<usize>,

    /// Vary gradients top-to-bottom instead of left-to-right
    #[arg(long)]
    vertical_gradient: bool,

    /// Keep checkerboards in RGB instead of remapping them to HSV bytes
    #[arg(long)]
    no_chess_remap: bool,

    /// Lattice cells per side for Perlin textures
    #[arg(long)]
    perlin_frequency: Option<f64>,

    /// Do not mix the clock into the Perlin variant draw
    #[arg(long)]
    no_perlin_reseed: bool,

    /// JSON config file; flags given on the command line override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn into_config(self) -> Result<BatchConfig> {
        let mut cfg = match &self.config {
            Some(path) => BatchConfig::from_json_file(path)?,
            None => BatchConfig::default(),
        };
        if let Some(count) = self.count {
            cfg.count = count;
        }
        if let Some(start) = self.start {
            cfg.start = start;
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(pattern) = self.pattern {
            cfg.pattern = pattern.parse::<PatternSelector>()?;
        }
        if let Some(resolution) = self.resolution {
            cfg.resolution = resolution;
        }
        if let Some(ext) = self.ext {
            cfg.image_ext = ext;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(threads) = self.threads {
            cfg.threads = threads;
        }
        if self.vertical_gradient {
            cfg.gradient.vertical = true;
        }
        if self.no_chess_remap {
            cfg.checkerboard.hsv_remap = false;
        }
        if let Some(frequency) = self.perlin_frequency {
            cfg.perlin.frequency = frequency;
        }
        if self.no_perlin_reseed {
            cfg.perlin.reseed_from_clock = false;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = args.into_config()?;
    let output_dir = config.output_dir.clone();
    BatchOrchestrator::new(config)
        .run()
        .with_context(|| format!("batch into {} aborted", output_dir.display()))?;
    Ok(())
}
