//! Pixel buffer and error types shared by all texture generators.

use thiserror::Error;

use crate::color::Color;

/// Error returned when a requested texture size is unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The side length was zero.
    #[error("texture resolution must be non-zero (got {resolution})")]
    InvalidResolution { resolution: u32 },
    /// The side length exceeded [`MAX_RESOLUTION`].
    #[error("texture resolution {resolution} exceeds MAX_RESOLUTION={max}")]
    ResolutionTooLarge { resolution: u32, max: u32 },
}

/// Maximum allowed texture side length.
///
/// An 8192² RGB8 buffer is 192 MB; larger requests are almost certainly a
/// typo on the command line.
pub const MAX_RESOLUTION: u32 = 8192;

/// Resolution guard for texture generators.
///
/// Call at the top of every `generate` implementation, before any pixel work.
#[inline]
pub fn validate_resolution(resolution: u32) -> Result<(), TextureError> {
    if resolution == 0 {
        return Err(TextureError::InvalidResolution { resolution });
    }
    if resolution > MAX_RESOLUTION {
        return Err(TextureError::ResolutionTooLarge {
            resolution,
            max: MAX_RESOLUTION,
        });
    }
    Ok(())
}

/// A square RGB8 pixel buffer, row-major with the origin at the top left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    resolution: u32,
    pixels: Vec<u8>,
}

impl Texture {
    /// A `resolution × resolution` texture filled with `color`.
    ///
    /// Callers validate `resolution` first; this constructor does not.
    pub(crate) fn filled(resolution: u32, color: Color) -> Self {
        let n = (resolution as usize) * (resolution as usize);
        let mut pixels = Vec::with_capacity(n * 3);
        for _ in 0..n {
            pixels.extend_from_slice(&color.0);
        }
        Self { resolution, pixels }
    }

    /// Build a texture by evaluating `f(x, y)` for every pixel.
    pub(crate) fn from_fn(resolution: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let n = (resolution as usize) * (resolution as usize);
        let mut pixels = Vec::with_capacity(n * 3);
        for y in 0..resolution {
            for x in 0..resolution {
                pixels.extend_from_slice(&f(x, y).0);
            }
        }
        Self { resolution, pixels }
    }

    /// Side length in pixels; width and height are both this value.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.resolution
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.resolution
    }

    /// Colour at `(x, y)`.  Panics if out of bounds, like slice indexing.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = self.offset(x, y);
        Color([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Iterate all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels
            .chunks_exact(3)
            .map(|p| Color([p[0], p[1], p[2]]))
    }

    /// Raw interleaved RGB8 bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Apply `f` to every pixel in place.
    pub(crate) fn map_in_place(&mut self, mut f: impl FnMut(Color) -> Color) {
        for p in self.pixels.chunks_exact_mut(3) {
            let out = f(Color([p[0], p[1], p[2]]));
            p.copy_from_slice(&out.0);
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.resolution && y < self.resolution);
        ((y as usize) * (self.resolution as usize) + x as usize) * 3
    }
}
