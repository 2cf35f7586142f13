//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

/// Remove a directory tree if present, then create it empty.
///
/// Removal is best-effort: a failure is logged and creation still runs.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if let Err(e) = fs::remove_dir_all(path) {
            tracing::warn!("failed to remove {}: {}", path.display(), e);
        }
    }
    ensure_dir(path)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Compile glob patterns, reporting the first invalid one.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid glob pattern: {}", p)))
        .collect()
}

/// Files under `base` whose path relative to `base` matches any pattern.
///
/// Results are relative, use `/` separators, and are sorted.
pub fn glob_relative_files(base: &Path, patterns: &[Pattern]) -> Result<Vec<String>> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut results = Vec::new();
    for entry in WalkDir::new(base).follow_links(true) {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", base.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_path(base, entry.path());
        let rel = to_slash(&rel);
        if patterns.iter().any(|p| p.matches_with(&rel, options)) {
            results.push(rel);
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
