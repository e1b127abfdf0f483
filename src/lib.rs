//! `pattern_textures` — batch generation of synthetic surface textures.
//!
//! # Architecture
//! Four generators produce square RGB8 [`Texture`]s:
//! [`FlatTextureGenerator`], [`CheckerboardGenerator`], [`GradientGenerator`]
//! and [`PerlinNoiseGenerator`].  Colours come from a [`ColorSampler`]; every
//! random draw goes through an injected [`RandomSource`], so a seeded batch is
//! reproducible.
//!
//! [`BatchOrchestrator`] walks an index range, renders each selected
//! [`PatternKind`], encodes it through a [`TextureCodec`], and writes the
//! matching `.material` script with the same base name.

pub mod batch;
pub mod checkerboard;
pub mod codec;
pub mod color;
pub mod config;
pub mod flat;
pub mod generator;
pub mod gradient;
pub mod material;
pub mod perlin;
pub mod random;

pub use batch::{BatchError, BatchOrchestrator, BatchSummary, OutputLayout, PatternSynth};
pub use checkerboard::{CheckerboardConfig, CheckerboardGenerator};
pub use codec::{ImageCodec, ImageExt, TextureCodec};
pub use color::{Color, ColorSampler};
pub use config::{BatchConfig, PatternKind, PatternSelector};
pub use flat::FlatTextureGenerator;
pub use generator::{MAX_RESOLUTION, Texture, TextureError};
pub use gradient::{GradientConfig, GradientGenerator};
pub use material::MaterialDescriptor;
pub use perlin::{PerlinConfig, PerlinNoiseGenerator, PerlinVariant};
pub use random::RandomSource;
