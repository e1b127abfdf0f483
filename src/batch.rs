//! Batch driver: names, generates, encodes, and describes every texture.
//!
//! For each index in `[start, start + count)` and each selected
//! [`PatternKind`] (in [`PatternKind::ALL`] order), the driver
//!
//!  1. derives the base name `<kind>_<index>`,
//!  2. renders a texture through [`PatternSynth`],
//!  3. encodes it to `textures/<base>.<ext>`,
//!  4. writes `scripts/<base>.material` pointing at that image.
//!
//! The first failure aborts the run: a dataset with a hole in its index range
//! is worse than no dataset.  A failed item never leaves an image without its
//! script, or a script without its image.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU32, Ordering},
};

use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    checkerboard::CheckerboardGenerator,
    codec::{ImageCodec, TextureCodec},
    color::ColorSampler,
    config::{BatchConfig, PatternKind},
    flat::FlatTextureGenerator,
    generator::{Texture, TextureError, validate_resolution},
    gradient::GradientGenerator,
    material,
    perlin::PerlinNoiseGenerator,
    random::RandomSource,
};

/// Fatal batch errors.  None of them are retried.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("could not save {}; please ensure the destination folder exists", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("could not write material script {}", path.display())]
    DescriptorWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no valid pattern kind `{0}` (expected one of: all, flat, chess, gradient, perlin)")]
    UnrecognizedPatternKind(String),
    #[error("could not read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build texture generation thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// The two output directories under the batch root.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    pub textures: PathBuf,
    pub scripts: PathBuf,
}

impl OutputLayout {
    /// Create `root/textures` and `root/scripts` if missing.
    pub fn prepare(root: &Path) -> Result<Self, BatchError> {
        let layout = Self {
            textures: root.join("textures"),
            scripts: root.join("scripts"),
        };
        for dir in [&layout.textures, &layout.scripts] {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(dir).map_err(|source| BatchError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            log::info!("Created {} folder", dir.display());
        }
        Ok(layout)
    }

    pub fn image_path(&self, base_name: &str, ext: &str) -> PathBuf {
        self.textures.join(format!("{base_name}.{ext}"))
    }

    pub fn script_path(&self, base_name: &str) -> PathBuf {
        self.scripts.join(format!("{base_name}.{}", material::MATERIAL_EXT))
    }

    /// Remove the image and script of one asset, if present.
    fn discard_pair(&self, base_name: &str, ext: &str) {
        discard(&self.image_path(base_name, ext));
        discard(&self.script_path(base_name));
    }
}

/// All generators plus the colour sampler, wired to one random stream.
///
/// This is the single dispatch point from [`PatternKind`] to a generator.
pub struct PatternSynth {
    sampler: ColorSampler,
    flat: FlatTextureGenerator,
    checkerboard: CheckerboardGenerator,
    gradient: GradientGenerator,
    vertical_gradient: bool,
    perlin: PerlinNoiseGenerator,
}

impl PatternSynth {
    /// Build every generator from `config`, deriving their sources from `rng`.
    pub fn new(config: &BatchConfig, mut rng: RandomSource) -> Self {
        let checkerboard_rng = rng.fork();
        let perlin_rng = rng.fork();
        Self {
            sampler: ColorSampler::new(rng),
            flat: FlatTextureGenerator::new(),
            checkerboard: CheckerboardGenerator::new(config.checkerboard.clone(), checkerboard_rng),
            gradient: GradientGenerator::new(),
            vertical_gradient: config.gradient.vertical,
            perlin: PerlinNoiseGenerator::new(config.perlin.clone(), perlin_rng),
        }
    }

    /// Render one texture of `kind` with freshly sampled colours.
    pub fn render(&mut self, kind: PatternKind, resolution: u32) -> Result<Texture, TextureError> {
        match kind {
            PatternKind::Flat => {
                let color = self.sampler.sample();
                self.flat.generate(color, resolution)
            }
            PatternKind::Checkerboard => {
                let a = self.sampler.sample();
                let b = self.sampler.sample();
                self.checkerboard.generate(a, b, resolution)
            }
            PatternKind::Gradient => {
                let a = self.sampler.sample();
                let b = self.sampler.sample();
                self.gradient.generate(a, b, resolution, self.vertical_gradient)
            }
            PatternKind::Perlin => self.perlin.generate_random(resolution),
        }
    }
}

/// What a completed run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub textures_written: usize,
    pub descriptors_written: usize,
    /// First and last index generated; `None` for an empty range.
    pub index_range: Option<(u32, u32)>,
    pub seed: u64,
}

/// Drives one batch over a [`BatchConfig`].
pub struct BatchOrchestrator<C = ImageCodec> {
    config: BatchConfig,
    codec: C,
}

impl BatchOrchestrator<ImageCodec> {
    /// Orchestrator using the `image`-crate codec for `config.image_ext`.
    pub fn new(config: BatchConfig) -> Self {
        let codec = ImageCodec::new(config.image_ext);
        Self { config, codec }
    }
}

impl<C: TextureCodec + Sync> BatchOrchestrator<C> {
    /// Orchestrator with a caller-supplied codec.
    pub fn with_codec(config: BatchConfig, codec: C) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Generate the whole batch, stopping at the first failure.
    ///
    /// The resolution is validated before any directory or file is touched.
    pub fn run(&self) -> Result<BatchSummary, BatchError> {
        validate_resolution(self.config.resolution)?;
        let layout = OutputLayout::prepare(&self.config.output_dir)?;

        let seed = self
            .config
            .seed
            .unwrap_or_else(|| RandomSource::from_entropy().next_u64());
        let indices = self.config.indices();
        let kinds = self.config.pattern.kinds();
        log::info!(
            "Generating {} index(es) of `{}` at {res}×{res}, seed {seed}",
            indices.len(),
            self.config.pattern,
            res = self.config.resolution,
        );

        if self.config.threads <= 1 {
            let mut synth = PatternSynth::new(&self.config, RandomSource::seeded(seed));
            for index in indices.clone() {
                self.log_progress(index);
                self.produce_index(&mut synth, &layout, index)?;
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .thread_name(|i| format!("texture-gen-{i}"))
                .build()?;
            // Lowest index seen failing so far; higher indices not yet
            // started are skipped.
            let first_failure = AtomicU32::new(u32::MAX);
            let attempted: Vec<(u32, Result<(), BatchError>)> = pool.install(|| {
                indices
                    .clone()
                    .into_par_iter()
                    .filter(|&index| index < first_failure.load(Ordering::Acquire))
                    .map(|index| {
                        self.log_progress(index);
                        let rng = RandomSource::for_index(seed, index as u64);
                        let mut synth = PatternSynth::new(&self.config, rng);
                        let result = self.produce_index(&mut synth, &layout, index);
                        if result.is_err() {
                            first_failure.fetch_min(index, Ordering::AcqRel);
                        }
                        (index, result)
                    })
                    .collect()
            });
            self.settle_parallel(&layout, attempted)?;
        }

        let written = indices.len() * kinds.len();
        let summary = BatchSummary {
            textures_written: written,
            descriptors_written: written,
            index_range: (!indices.is_empty()).then(|| (indices.start, indices.end - 1)),
            seed,
        };
        log::info!("Wrote {written} texture(s) to {}", self.config.output_dir.display());
        Ok(summary)
    }

    /// Surface the lowest failed index and drop everything written above it,
    /// so an aborted parallel run leaves the same contiguous prefix a
    /// sequential one would.
    fn settle_parallel(
        &self,
        layout: &OutputLayout,
        attempted: Vec<(u32, Result<(), BatchError>)>,
    ) -> Result<(), BatchError> {
        let Some(failed) = attempted
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|&(index, _)| index)
            .min()
        else {
            return Ok(());
        };

        let ext = self.config.image_ext.as_str();
        let mut error = None;
        for (index, result) in attempted {
            if index > failed {
                for &kind in self.config.pattern.kinds() {
                    layout.discard_pair(&kind.base_name(index), ext);
                }
            } else if index == failed {
                error = result.err();
            }
        }
        log::warn!("Rolled back indices above {failed} after a failed parallel run");
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn log_progress(&self, index: u32) {
        log::info!(
            "Generating {} of {}",
            index - self.config.start + 1,
            self.config.count
        );
    }

    /// Every selected kind for one index, in order.
    fn produce_index(
        &self,
        synth: &mut PatternSynth,
        layout: &OutputLayout,
        index: u32,
    ) -> Result<(), BatchError> {
        for &kind in self.config.pattern.kinds() {
            self.produce(synth, layout, kind, index)?;
        }
        Ok(())
    }

    /// Render, encode and describe a single asset.
    fn produce(
        &self,
        synth: &mut PatternSynth,
        layout: &OutputLayout,
        kind: PatternKind,
        index: u32,
    ) -> Result<(), BatchError> {
        let base_name = kind.base_name(index);
        let ext = self.config.image_ext.as_str();
        let texture = synth.render(kind, self.config.resolution)?;

        let image_path = layout.image_path(&base_name, ext);
        if let Err(source) = self.codec.encode(&texture, &image_path) {
            log::error!("Could not save {}", image_path.display());
            // A script left over from an earlier run would now point at nothing.
            layout.discard_pair(&base_name, ext);
            return Err(BatchError::Encode {
                path: image_path,
                source,
            });
        }

        match material::emit(&base_name, ext, &layout.scripts) {
            Ok(script_path) => {
                log::debug!("{} + {}", image_path.display(), script_path.display());
                Ok(())
            }
            Err(source) => {
                let path = layout.script_path(&base_name);
                log::error!("Could not write {}", path.display());
                layout.discard_pair(&base_name, ext);
                Err(BatchError::DescriptorWrite { path, source })
            }
        }
    }
}

/// Remove a half-written artifact.  Missing files are fine.
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            log::warn!("Could not remove partial file {}: {e}", path.display());
        }
    }
}
