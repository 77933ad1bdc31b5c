//! Application configuration and trackbar limits.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! file (or no file) reproduces the stock demo run.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound of the blur sigma trackbar.
pub const SIGMA_MAX: i64 = 10;
/// Upper bound of both Canny threshold trackbars.
pub const THRESHOLD_MAX: i64 = 100;
/// Upper bound of the Sobel aperture selector (aperture = 2 * value + 3).
pub const APERTURE_MAX: i64 = 2;
/// Upper bound of the kernel size selector (size = 2 * value + 3).
pub const KERNEL_SIZE_MAX: i64 = 2;
/// Upper bound of the enhancement intensity trackbar.
pub const ENHANCE_MAX: i64 = 100;
/// Upper bound of the emboss intensity trackbar.
pub const EMBOSS_MAX: i64 = 7;

/// Prefix that routes a `--set` override to the edge window.
pub const EDGES_PREFIX: &str = "edges.";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source image.
    pub input: PathBuf,
    /// Where the final filter-effects frame is written.
    pub output: PathBuf,
    /// When set, every frame shown is also written here as PNG.
    pub preview_dir: Option<PathBuf>,
    pub effects: EffectsConfig,
    pub edges: EdgesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("walt.jpg"),
            output: PathBuf::from("output_filter_effects_with_trackbars.jpg"),
            preview_dir: None,
            effects: EffectsConfig::default(),
            edges: EdgesConfig::default(),
        }
    }
}

/// Initial trackbar positions of the filter-effects window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EffectsConfig {
    pub kernel_size: i64,
    pub enhance: i64,
    pub emboss: i64,
}

impl EffectsConfig {
    /// Trackbar name and initial position, in window order.
    pub fn positions(&self) -> [(&'static str, i64); 3] {
        [
            ("enhance", self.enhance),
            ("emboss", self.emboss),
            ("kernel_size", self.kernel_size),
        ]
    }

    fn set(&mut self, name: &str, value: i64) -> Option<()> {
        match name {
            "kernel_size" => self.kernel_size = value,
            "enhance" => self.enhance = value,
            "emboss" => self.emboss = value,
            _ => return None,
        }
        Some(())
    }
}

/// Edge preview window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgesConfig {
    /// Whether the edge window is opened at all.
    pub enabled: bool,
    pub output: PathBuf,
    pub sigma: i64,
    pub threshold1: i64,
    pub threshold2: i64,
    pub aperture: i64,
    pub l2_gradient: i64,
    /// Font for the label. System fonts, then the bundled one, are tried when unset.
    pub font: Option<PathBuf>,
}

impl Default for EdgesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output: PathBuf::from("output_edges_with_trackbar.jpg"),
            sigma: 2,
            threshold1: 20,
            threshold2: 60,
            aperture: 0,
            l2_gradient: 0,
            font: None,
        }
    }
}

impl EdgesConfig {
    /// Trackbar name and initial position, in window order.
    pub fn positions(&self) -> [(&'static str, i64); 5] {
        [
            ("sigma", self.sigma),
            ("threshold1", self.threshold1),
            ("threshold2", self.threshold2),
            ("aperture", self.aperture),
            ("l2_gradient", self.l2_gradient),
        ]
    }

    fn set(&mut self, name: &str, value: i64) -> Option<()> {
        match name {
            "sigma" => self.sigma = value,
            "threshold1" => self.threshold1 = value,
            "threshold2" => self.threshold2 = value,
            "aperture" => self.aperture = value,
            "l2_gradient" => self.l2_gradient = value,
            _ => return None,
        }
        Some(())
    }
}

impl AppConfig {
    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply a `name=value` override to an initial trackbar position.
    ///
    /// Plain names address the filter-effects window; names prefixed with
    /// `edges.` address the edge window. Range checks happen when the
    /// position is applied to its window.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
        let name = name.trim();
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidOverride(assignment.to_string()))?;

        let applied = match name.strip_prefix(EDGES_PREFIX) {
            Some(edge_name) => self.edges.set(edge_name, value),
            None => self.effects.set(name, value),
        };
        applied.ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))
    }
}
