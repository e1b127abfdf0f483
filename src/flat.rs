//! Single-colour texture generator.

use crate::{
    color::Color,
    generator::{Texture, TextureError, validate_resolution},
};

/// Fills a texture with one colour.  Holds no state and draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTextureGenerator;

impl FlatTextureGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, color: Color, resolution: u32) -> Result<Texture, TextureError> {
        validate_resolution(resolution)?;
        Ok(Texture::filled(resolution, color))
    }
}
