//! Greyscale Perlin-noise texture generator.
//!
//! Samples a 3D coherent-noise field over the unit square of the texture.  For
//! pixel `(x, y)` the sample point is
//!
//!   `((x / res + ox) · f, (y / res + oy) · f, oz · f)`
//!
//! where `f` is [`PerlinConfig::frequency`] and `(ox, oy, oz)` are per-call
//! offsets.  The third coordinate selects a slice through the field, so
//! changing `oz` alone gives a related but distinct image on the same grid.
//!
//! Two render variants:
//!   * [`PerlinVariant::Smooth`] maps single-octave Perlin noise linearly to grey.
//!   * [`PerlinVariant::Billow`] sums absolute-value octaves first, giving the
//!     banded, turbulent look.

use noise::{Billow, MultiFractal, NoiseFn, Perlin};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    generator::{Texture, TextureError, validate_resolution},
    random::RandomSource,
};

/// Which intensity shaping to apply to the raw noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerlinVariant {
    Smooth = 0,
    Billow = 1,
}

impl TryFrom<u8> for PerlinVariant {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::Smooth),
            1 => Ok(Self::Billow),
            other => Err(other),
        }
    }
}

/// Configures the appearance of a [`PerlinNoiseGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinConfig {
    /// Permutation-table seed of the underlying Perlin source.
    pub seed: u32,
    /// Lattice cells crossed per texture side.
    pub frequency: f64,
    /// Octaves summed by the billow variant.
    pub octaves: usize,
    /// Mix the wall clock into the random stream before drawing the variant.
    pub reseed_from_clock: bool,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 8.0,
            octaves: 4,
            reseed_from_clock: true,
        }
    }
}

/// Procedural Perlin-noise generator.
pub struct PerlinNoiseGenerator {
    config: PerlinConfig,
    rng: RandomSource,
    smooth: Perlin,
    billow: Billow<Perlin>,
}

impl PerlinNoiseGenerator {
    /// Create a new generator drawing offsets and variants from `rng`.
    pub fn new(config: PerlinConfig, rng: RandomSource) -> Self {
        let smooth = Perlin::new(config.seed);
        let billow = Billow::<Perlin>::new(config.seed)
            .set_octaves(config.octaves.max(1))
            .set_frequency(1.0);
        Self {
            config,
            rng,
            smooth,
            billow,
        }
    }

    pub fn config(&self) -> &PerlinConfig {
        &self.config
    }

    /// Draw fresh offsets and a variant, then render.
    ///
    /// The offsets come first; when [`PerlinConfig::reseed_from_clock`] is set
    /// the stream is reseeded from the clock immediately before the variant
    /// draw.
    pub fn generate_random(&mut self, resolution: u32) -> Result<Texture, TextureError> {
        validate_resolution(resolution)?;
        let offsets = [
            self.rng.random::<f64>(),
            self.rng.random::<f64>(),
            self.rng.random::<f64>(),
        ];
        if self.config.reseed_from_clock {
            self.rng.reseed_from_clock();
        }
        let variant = if self.rng.random::<bool>() {
            PerlinVariant::Billow
        } else {
            PerlinVariant::Smooth
        };
        log::trace!("perlin: variant {variant:?}, offsets {offsets:?}");
        self.generate(resolution, variant, offsets)
    }

    /// Render one texture for explicit inputs.  Deterministic.
    pub fn generate(
        &self,
        resolution: u32,
        variant: PerlinVariant,
        offsets: [f64; 3],
    ) -> Result<Texture, TextureError> {
        validate_resolution(resolution)?;
        let [ox, oy, oz] = offsets;
        let f = self.config.frequency;
        let r = resolution as f64;
        let z = oz * f;

        // Column coordinates are the same for every row.
        let cols: Vec<f64> = (0..resolution).map(|x| (x as f64 / r + ox) * f).collect();

        Ok(Texture::from_fn(resolution, |x, y| {
            let ny = (y as f64 / r + oy) * f;
            let point = [cols[x as usize], ny, z];
            let raw = match variant {
                PerlinVariant::Smooth => self.smooth.get(point),
                PerlinVariant::Billow => self.billow.get(point),
            };
            let v = to_u8(raw);
            Color([v, v, v])
        }))
    }
}

/// Map a raw noise sample from `[-1, 1]` to an unsigned byte `[0, 255]`.
///
/// Out-of-range samples (billow can overshoot slightly) are clamped.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    (normalize(v).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Map a raw noise sample from `[-1, 1]` to `[0, 1]`.
#[inline]
pub fn normalize(v: f64) -> f64 {
    v * 0.5 + 0.5
}
