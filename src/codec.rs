//! Image encoding for generated textures.
//!
//! The batch driver only needs "write this buffer to that path"; the
//! [`TextureCodec`] trait is that seam, so tests can substitute a codec that
//! fails on demand.  [`ImageCodec`] is the production implementation on top of
//! the `image` crate.

use std::path::Path;

use image::{ImageError, ImageFormat, ImageResult, RgbImage};
use serde::{Deserialize, Serialize};

use crate::generator::Texture;

/// Output image container, chosen by file extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExt {
    Png,
    #[default]
    Jpg,
    Bmp,
    Tga,
}

impl ImageExt {
    /// Extension written after the base name, without the dot.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExt::Png => "png",
            ImageExt::Jpg => "jpg",
            ImageExt::Bmp => "bmp",
            ImageExt::Tga => "tga",
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageExt::Png => ImageFormat::Png,
            ImageExt::Jpg => ImageFormat::Jpeg,
            ImageExt::Bmp => ImageFormat::Bmp,
            ImageExt::Tga => ImageFormat::Tga,
        }
    }
}

impl std::str::FromStr for ImageExt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(ImageExt::Png),
            "jpg" | "jpeg" => Ok(ImageExt::Jpg),
            "bmp" => Ok(ImageExt::Bmp),
            "tga" => Ok(ImageExt::Tga),
            other => Err(format!("unsupported image extension `{other}`")),
        }
    }
}

impl std::fmt::Display for ImageExt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persists a texture to disk.
pub trait TextureCodec {
    /// Encode `texture` to `path`.
    fn encode(&self, texture: &Texture, path: &Path) -> ImageResult<()>;
}

/// [`TextureCodec`] backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec {
    ext: ImageExt,
}

impl ImageCodec {
    pub fn new(ext: ImageExt) -> Self {
        Self { ext }
    }

    pub fn ext(&self) -> ImageExt {
        self.ext
    }
}

impl TextureCodec for ImageCodec {
    fn encode(&self, texture: &Texture, path: &Path) -> ImageResult<()> {
        let image = to_rgb_image(texture)?;
        image.save_with_format(path, self.ext.format())
    }
}

/// Copy a texture into an [`RgbImage`].
pub fn to_rgb_image(texture: &Texture) -> ImageResult<RgbImage> {
    RgbImage::from_raw(texture.width(), texture.height(), texture.as_bytes().to_vec()).ok_or_else(
        || {
            ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        },
    )
}
