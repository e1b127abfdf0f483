//! Batch configuration: pattern selection, output layout, generator settings.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    batch::BatchError, checkerboard::CheckerboardConfig, codec::ImageExt,
    gradient::GradientConfig, perlin::PerlinConfig,
};

/// One of the four texture families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Flat,
    Checkerboard,
    Gradient,
    Perlin,
}

impl PatternKind {
    /// Generation order within one index.
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Flat,
        PatternKind::Checkerboard,
        PatternKind::Gradient,
        PatternKind::Perlin,
    ];

    /// Selector string and base-name stem.
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Flat => "flat",
            PatternKind::Checkerboard => "chess",
            PatternKind::Gradient => "gradient",
            PatternKind::Perlin => "perlin",
        }
    }

    /// `<kind>_<index>`, shared by the image file and its material script.
    pub fn base_name(self, index: u32) -> String {
        format!("{}_{index}", self.as_str())
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kinds a batch generates: one, or all four.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternSelector {
    #[default]
    All,
    Only(PatternKind),
}

impl PatternSelector {
    pub fn kinds(&self) -> &'static [PatternKind] {
        match self {
            PatternSelector::All => &PatternKind::ALL,
            PatternSelector::Only(PatternKind::Flat) => &[PatternKind::Flat],
            PatternSelector::Only(PatternKind::Checkerboard) => &[PatternKind::Checkerboard],
            PatternSelector::Only(PatternKind::Gradient) => &[PatternKind::Gradient],
            PatternSelector::Only(PatternKind::Perlin) => &[PatternKind::Perlin],
        }
    }
}

impl FromStr for PatternSelector {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, BatchError> {
        match s {
            "all" => Ok(PatternSelector::All),
            "flat" => Ok(PatternSelector::Only(PatternKind::Flat)),
            "chess" => Ok(PatternSelector::Only(PatternKind::Checkerboard)),
            "gradient" => Ok(PatternSelector::Only(PatternKind::Gradient)),
            "perlin" => Ok(PatternSelector::Only(PatternKind::Perlin)),
            other => Err(BatchError::UnrecognizedPatternKind(other.to_owned())),
        }
    }
}

impl TryFrom<String> for PatternSelector {
    type Error = BatchError;

    fn try_from(s: String) -> Result<Self, BatchError> {
        s.parse()
    }
}

impl From<PatternSelector> for String {
    fn from(selector: PatternSelector) -> String {
        selector.to_string()
    }
}

impl fmt::Display for PatternSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSelector::All => f.write_str("all"),
            PatternSelector::Only(kind) => kind.fmt(f),
        }
    }
}

/// Everything one batch run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of indices to generate.
    pub count: u32,
    /// First index.
    pub start: u32,
    /// Side length of every texture.
    pub resolution: u32,
    /// Root directory; `textures/` and `scripts/` are created inside it.
    pub output_dir: PathBuf,
    pub pattern: PatternSelector,
    pub image_ext: ImageExt,
    /// Root seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Worker threads.  `1` runs strictly in order on the calling thread.
    pub threads: usize,
    pub checkerboard: CheckerboardConfig,
    pub gradient: GradientConfig,
    pub perlin: PerlinConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 100,
            start: 0,
            resolution: 500,
            output_dir: PathBuf::from("output/"),
            pattern: PatternSelector::All,
            image_ext: ImageExt::Jpg,
            seed: None,
            threads: 1,
            checkerboard: CheckerboardConfig::default(),
            gradient: GradientConfig::default(),
            perlin: PerlinConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Load a JSON config file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, BatchError> {
        let text = fs::read_to_string(path).map_err(|source| BatchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BatchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Half-open index range `[start, start + count)`.
    ///
    /// Saturates at `u32::MAX` rather than wrapping.
    pub fn indices(&self) -> std::ops::Range<u32> {
        self.start..self.start.saturating_add(self.count)
    }
}
