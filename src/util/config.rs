//! Configuration file support.
//!
//! An optional `presetgen.toml` at the project root tunes where presets are
//! read from, which CMake to run, and which artifacts `compare` looks at:
//!
//! ```toml
//! [presets]
//! dir = "buildtools/presets"
//!
//! [generate]
//! cmake = "/opt/cmake/bin/cmake"
//!
//! [compare]
//! patterns = ["**/*.vcxproj", "**/*.sln"]
//! ```
//!
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::compare::DEFAULT_PATTERNS;
use crate::sources::DEFAULT_PRESETS_DIR;
use crate::util::fs::read_to_string;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "presetgen.toml";

/// presetgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preset lookup settings
    pub presets: PresetsConfig,

    /// Generation settings
    pub generate: GenerateConfig,

    /// Comparison settings
    pub compare: CompareConfig,
}

/// Preset lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Preset directory relative to the project root. Its `public`
    /// subdirectory is searched second.
    pub dir: PathBuf,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        PresetsConfig {
            dir: PathBuf::from(DEFAULT_PRESETS_DIR),
        }
    }
}

/// Generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// CMake executable, used instead of `PM_cmake_PATH` or `PATH` lookup
    pub cmake: Option<PathBuf>,
}

/// Comparison settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Glob patterns selecting artifact files, relative to each root
    pub patterns: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        CompareConfig {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Load `presetgen.toml` from `root`.
    pub fn for_root(root: &Path) -> Self {
        Self::load_or_default(&root.join(CONFIG_FILE))
    }
}
