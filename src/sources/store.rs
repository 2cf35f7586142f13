//! Preset store - locates preset files under the project root.
//!
//! Presets live in two places: an internal directory
//! (`<root>/buildtools/presets`) and its `public` subdirectory. Internal
//! presets shadow public ones with the same name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::errors::GenerateError;
use crate::core::platform::{is_preset_eligible, HostPlatform};
use crate::core::preset::PresetRecord;

/// Default preset directory, relative to the project root.
pub const DEFAULT_PRESETS_DIR: &str = "buildtools/presets";

/// Suffix of per-user preset variants (`<name>.user.xml`).
const USER_SUFFIX: &str = ".user";

/// A preset as shown in the selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    /// Name to pass back to `generate`.
    pub name: String,
    pub comment: Option<String>,
    pub path: PathBuf,
}

/// The two-level preset directory of a project.
#[derive(Debug, Clone)]
pub struct PresetStore {
    internal: PathBuf,
    public: PathBuf,
}

impl PresetStore {
    /// Store rooted at `<root>/<dir>`.
    pub fn new(root: &Path, dir: impl AsRef<Path>) -> Self {
        let internal = root.join(dir);
        let public = internal.join("public");
        PresetStore { internal, public }
    }

    pub fn internal_dir(&self) -> &Path {
        &self.internal
    }

    pub fn public_dir(&self) -> &Path {
        &self.public
    }

    /// Path of the preset file for `name`; internal first, then public.
    pub fn locate(&self, name: &str) -> Result<PathBuf, GenerateError> {
        let file = format!("{}.xml", name);
        let mut tried = Vec::with_capacity(2);

        for dir in [&self.internal, &self.public] {
            let candidate = dir.join(&file);
            if candidate.is_file() {
                tracing::info!("Using preset xml: {}", candidate.display());
                return Ok(candidate);
            }
            tracing::debug!("no preset at {}", candidate.display());
            tried.push(candidate);
        }

        Err(GenerateError::PresetNotFound {
            name: name.to_string(),
            tried,
        })
    }

    /// Locate and parse the preset named `name`.
    pub fn resolve(&self, name: &str) -> Result<PresetRecord> {
        let path = self.locate(name)?;
        PresetRecord::load(&path)
    }

    /// Every preset in the store, sorted by file name.
    ///
    /// Only the internal directory is listed when it holds any presets;
    /// otherwise the public one. Files that fail to parse are skipped with a
    /// warning.
    pub fn list(&self) -> Result<Vec<PresetEntry>> {
        let mut files = xml_files(&self.internal)?;
        if files.is_empty() {
            files = xml_files(&self.public)?;
        }

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let record = match PresetRecord::load(&path) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                    continue;
                }
            };

            let is_user = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.ends_with(USER_SUFFIX));
            let name = if is_user {
                format!("{}{}", record.name(), USER_SUFFIX)
            } else {
                record.name().to_string()
            };

            entries.push(PresetEntry {
                name,
                comment: record.comment().map(str::to_string),
                path,
            });
        }
        Ok(entries)
    }

    /// Presets that can be generated on `host`.
    pub fn list_eligible(&self, host: HostPlatform) -> Result<Vec<PresetEntry>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|entry| is_preset_eligible(&entry.name, host))
            .collect())
    }
}

/// `*.xml` files directly inside `dir`, sorted. A missing directory is empty.
fn xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
