//! `.material` script emitter.
//!
//! Each generated image gets a companion script that binds a single-pass
//! technique with an anisotropically filtered texture unit to the image file.
//! Both names share the same base name, e.g. `chess_12` ↔ `chess_12.png`.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// Prefix applied to both the material name and the texture reference.
pub const MATERIAL_PREFIX: &str = "Plugin/";
/// Extension of emitted script files.
pub const MATERIAL_EXT: &str = "material";
/// Value of the `max_anisotropy` directive.
pub const MAX_ANISOTROPY: u32 = 16;

/// Text record pairing a base name with its image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialDescriptor {
    base_name: String,
    image_ext: String,
}

impl MaterialDescriptor {
    pub fn new(base_name: impl Into<String>, image_ext: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            image_ext: image_ext.into(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// File name of the referenced image, e.g. `flat_0.png`.
    pub fn image_name(&self) -> String {
        format!("{}.{}", self.base_name, self.image_ext)
    }

    /// Path of this descriptor inside `scripts_dir`.
    pub fn path_in(&self, scripts_dir: &Path) -> PathBuf {
        scripts_dir.join(format!("{}.{MATERIAL_EXT}", self.base_name))
    }

    /// Write the script into `scripts_dir`, replacing any existing file.
    pub fn write_to(&self, scripts_dir: &Path) -> io::Result<PathBuf> {
        let path = self.path_in(scripts_dir);
        fs::write(&path, self.to_string())?;
        Ok(path)
    }
}

impl fmt::Display for MaterialDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "material {MATERIAL_PREFIX}{}", self.base_name)?;
        writeln!(f, "{{")?;
        writeln!(f, "  technique")?;
        writeln!(f, "  {{")?;
        writeln!(f, "    pass")?;
        writeln!(f, "    {{")?;
        writeln!(f, "      texture_unit")?;
        writeln!(f, "      {{")?;
        writeln!(f, "        texture {MATERIAL_PREFIX}{}", self.image_name())?;
        // "anistropic" is the spelling the consuming renderer expects.
        writeln!(f, "        filtering anistropic")?;
        writeln!(f, "        max_anisotropy {MAX_ANISOTROPY}")?;
        writeln!(f, "      }}")?;
        writeln!(f, "    }}")?;
        writeln!(f, "  }}")?;
        writeln!(f, "}}")
    }
}

/// Write `<scripts_dir>/<base_name>.material` referencing `<base_name>.<image_ext>`.
pub fn emit(base_name: &str, image_ext: &str, scripts_dir: &Path) -> io::Result<PathBuf> {
    MaterialDescriptor::new(base_name, image_ext).write_to(scripts_dir)
}
