use std::path::PathBuf;

use crate::assets::decode::OutputFormat;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::cpu_filter::CpuFilters;
use crate::render::filter::{FilterBackend, TempDirNamer};
use crate::render::magick::ImageMagick;

/// Which filter capability blur shadows, masked images, nice text and EFFECT/SCALE use.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterMode {
    /// No filter capability: effects that need one fall back or are skipped.
    Disabled,
    #[default]
    InProcess,
    /// `convert`/`composite` from `bin_dir`, or from `PATH` when unset.
    ImageMagick {
        #[serde(default)]
        bin_dir: Option<PathBuf>,
    },
}

/// Engine-wide settings that the graphic setup itself cannot override.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Upper canvas bound when the setup has no `maxWidth`.
    pub max_width: u32,
    pub max_height: u32,
    /// `textMaxLength` fallback.
    pub text_max_length: usize,
    /// Font used by TEXT instructions without `fontFile`.
    pub default_font: Option<PathBuf>,
    pub filters: FilterMode,
    /// Directory for external filter round trips; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    pub default_format: OutputFormat,
    pub jpeg_quality: u8,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            max_width: 2000,
            max_height: 2000,
            text_max_length: crate::text::normalize::DEFAULT_MAX_LENGTH,
            default_font: None,
            filters: FilterMode::default(),
            temp_dir: None,
            default_format: OutputFormat::default(),
            jpeg_quality: 85,
        }
    }
}

impl EngineOpts {
    pub fn from_json_str(s: &str) -> ForgeResult<Self> {
        serde_json::from_str(s).map_err(|e| ForgeError::serde(e.to_string()))
    }

    /// Build the filter backend for one render, with its own temp-file namespace.
    pub fn filter_backend(&self) -> Option<Box<dyn FilterBackend>> {
        match &self.filters {
            FilterMode::Disabled => None,
            FilterMode::InProcess => Some(Box::new(CpuFilters::new())),
            FilterMode::ImageMagick { bin_dir } => {
                let dir = self.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
                Some(Box::new(ImageMagick::new(
                    bin_dir.clone(),
                    Box::new(TempDirNamer::unique(dir)),
                )))
            }
        }
    }
}
