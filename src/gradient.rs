//! Two-colour linear gradient generator.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    generator::{Texture, TextureError, validate_resolution},
};

/// Configures the gradient axis used by the batch driver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// `false` varies colour left-to-right, `true` top-to-bottom.
    pub vertical: bool,
}

/// Linear gradient generator.  Deterministic; draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientGenerator;

impl GradientGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Blend from `color_a` at coordinate 0 to `color_b` at `resolution - 1`.
    ///
    /// A 1×1 texture is the degenerate case and takes `color_a`.
    pub fn generate(
        &self,
        color_a: Color,
        color_b: Color,
        resolution: u32,
        vertical: bool,
    ) -> Result<Texture, TextureError> {
        validate_resolution(resolution)?;

        // One colour per axis coordinate, shared by the whole row/column.
        let ramp: Vec<Color> = (0..resolution)
            .map(|t| color_a.lerp(color_b, blend_factor(t, resolution)))
            .collect();

        Ok(Texture::from_fn(resolution, |x, y| {
            if vertical {
                ramp[y as usize]
            } else {
                ramp[x as usize]
            }
        }))
    }
}

#[inline]
fn blend_factor(t: u32, resolution: u32) -> f64 {
    if resolution <= 1 {
        0.0
    } else {
        t as f64 / (resolution - 1) as f64
    }
}
