//! Two-colour checkerboard generator.
//!
//! The algorithm:
//!  1. Draw a square count from `[MIN_SQUARES, MIN_SQUARES + SQUARE_SPAN)`.
//!  2. Derive the block width as `resolution / squares`, bumped to the next
//!     odd number when even (and never below 1).
//!  3. Alternate the two colours on `(x / block + y / block) % 2`.
//!  4. Optionally remap the finished buffer into packed HSV bytes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    generator::{Texture, TextureError, validate_resolution},
    random::RandomSource,
};

/// Smallest number of squares drawn along one side.
pub const MIN_SQUARES: u32 = 8;
/// Number of distinct square counts above [`MIN_SQUARES`] (so 8..=27).
pub const SQUARE_SPAN: u32 = 20;

/// Configures a [`CheckerboardGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerboardConfig {
    /// Apply the HSV byte remap to the tiled buffer before returning.
    pub hsv_remap: bool,
}

impl Default for CheckerboardConfig {
    fn default() -> Self {
        Self { hsv_remap: true }
    }
}

/// Block width for a given resolution and square count.
///
/// Even widths are bumped by one; a zero width (more squares than pixels)
/// therefore becomes 1 rather than a divide-by-zero.
#[inline]
pub fn block_size(resolution: u32, squares: u32) -> u32 {
    let mut block = resolution / squares.max(1);
    if block % 2 == 0 {
        block += 1;
    }
    block.max(1)
}

/// Procedural checkerboard generator.
pub struct CheckerboardGenerator {
    config: CheckerboardConfig,
    rng: RandomSource,
}

impl CheckerboardGenerator {
    /// Create a new generator drawing square counts from `rng`.
    pub fn new(config: CheckerboardConfig, rng: RandomSource) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &CheckerboardConfig {
        &self.config
    }

    /// Tile `color_a`/`color_b` with a freshly drawn square count, then apply
    /// the configured remap.
    pub fn generate(
        &mut self,
        color_a: Color,
        color_b: Color,
        resolution: u32,
    ) -> Result<Texture, TextureError> {
        validate_resolution(resolution)?;
        let squares = MIN_SQUARES + self.rng.random_range(0..SQUARE_SPAN);
        let block = block_size(resolution, squares);
        log::trace!("checkerboard: {squares} squares, block width {block}");

        let mut texture = tile(color_a, color_b, resolution, block);
        if self.config.hsv_remap {
            texture.map_in_place(Color::to_hsv_bytes);
        }
        Ok(texture)
    }
}

/// The raw alternating tiling, before any remap.
pub fn tile(color_a: Color, color_b: Color, resolution: u32, block: u32) -> Texture {
    let block = block.max(1);
    Texture::from_fn(resolution, |x, y| {
        if (x / block + y / block) % 2 == 0 {
            color_a
        } else {
            color_b
        }
    })
}
