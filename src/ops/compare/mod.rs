//! Directory artifact comparison.
//!
//! Checks that a candidate tree is a fresh, faithful copy of a reference
//! tree. Checks run in a fixed order and stop at the first failure:
//!
//! 1. Both trees hold the same set of relative paths.
//! 2. For each path, in sorted order:
//!    - the candidate was modified strictly after the reference,
//!    - both files read as text and are non-empty,
//!    - the line counts agree,
//!    - every line agrees.
//!
//! Failures are reported as a [`ComparisonOutcome`], not as errors. Only
//! failing to enumerate a tree is an error.

mod format;
mod types;

pub use format::{format_outcome, format_outcome_for_output, format_outcome_json};
pub use types::{
    format_time, ComparisonOutcome, DirectorySnapshot, FailureReason, Mismatch, OutputFormat,
    OutputFormatParseError, Side,
};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;

use crate::util::fs::{compile_patterns, glob_relative_files};

/// Patterns used when none are configured.
pub const DEFAULT_PATTERNS: &[&str] = &["**/*"];

/// Enumerates artifact files under a root.
pub trait ArtifactLister {
    /// Relative, `/`-separated paths of every artifact under `root`.
    fn list(&self, root: &Path) -> Result<Vec<String>>;
}

/// Lists regular files whose relative path matches any glob pattern.
#[derive(Debug, Clone)]
pub struct GlobLister {
    patterns: Vec<Pattern>,
}

impl GlobLister {
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(GlobLister {
            patterns: compile_patterns(patterns)?,
        })
    }
}

impl Default for GlobLister {
    fn default() -> Self {
        GlobLister {
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }
}

impl ArtifactLister for GlobLister {
    fn list(&self, root: &Path) -> Result<Vec<String>> {
        if !root.is_dir() {
            anyhow::bail!("not a directory: {}", root.display());
        }
        glob_relative_files(root, &self.patterns)
    }
}

impl DirectorySnapshot {
    /// Enumerate `root` through `lister`.
    pub fn capture(root: &Path, lister: &dyn ArtifactLister) -> Result<Self> {
        let files: BTreeSet<String> = lister
            .list(root)
            .with_context(|| format!("failed to list artifacts in {}", root.display()))?
            .into_iter()
            .collect();
        Ok(DirectorySnapshot {
            root: root.to_path_buf(),
            files: files.into_iter().collect(),
        })
    }
}

/// Compare the artifacts under `candidate` against those under `reference`.
pub fn compare(
    candidate: &Path,
    reference: &Path,
    lister: &dyn ArtifactLister,
) -> Result<ComparisonOutcome> {
    let candidate_snapshot = DirectorySnapshot::capture(candidate, lister)?;
    let reference_snapshot = DirectorySnapshot::capture(reference, lister)?;

    tracing::debug!(
        "comparing {} candidate files against {} reference files",
        candidate_snapshot.files.len(),
        reference_snapshot.files.len()
    );

    Ok(compare_snapshots(&candidate_snapshot, &reference_snapshot))
}

/// Compare two already-captured snapshots.
pub fn compare_snapshots(
    candidate: &DirectorySnapshot,
    reference: &DirectorySnapshot,
) -> ComparisonOutcome {
    let mut outcome = ComparisonOutcome {
        candidate: candidate.root.clone(),
        reference: reference.root.clone(),
        files_checked: 0,
        mismatch: None,
    };

    if let Some(mismatch) = check_existence(candidate, reference) {
        outcome.mismatch = Some(mismatch);
        return outcome;
    }

    for rel in &reference.files {
        let pair = FilePair {
            rel,
            candidate: candidate.root.join(rel),
            reference: reference.root.join(rel),
        };
        if let Some(mismatch) = pair.check() {
            tracing::debug!("{}: {}", rel, mismatch.reason());
            outcome.mismatch = Some(mismatch);
            return outcome;
        }
        outcome.files_checked += 1;
    }

    outcome
}

fn check_existence(candidate: &DirectorySnapshot, reference: &DirectorySnapshot) -> Option<Mismatch> {
    let candidate_set: BTreeSet<&String> = candidate.files.iter().collect();
    let reference_set: BTreeSet<&String> = reference.files.iter().collect();

    let missing: Vec<String> = reference_set
        .difference(&candidate_set)
        .map(|s| s.to_string())
        .collect();
    let excess: Vec<String> = candidate_set
        .difference(&reference_set)
        .map(|s| s.to_string())
        .collect();

    if !missing.is_empty() {
        Some(Mismatch::MissingFiles { missing, excess })
    } else if !excess.is_empty() {
        Some(Mismatch::ExcessFiles { excess })
    } else {
        None
    }
}

struct FilePair<'a> {
    rel: &'a str,
    candidate: PathBuf,
    reference: PathBuf,
}

impl FilePair<'_> {
    fn check(&self) -> Option<Mismatch> {
        let candidate_modified = match modified(&self.candidate, Side::Candidate) {
            Ok(t) => t,
            Err(m) => return Some(m),
        };
        let reference_modified = match modified(&self.reference, Side::Reference) {
            Ok(t) => t,
            Err(m) => return Some(m),
        };
        if candidate_modified <= reference_modified {
            return Some(Mismatch::StaleCandidate {
                file: self.rel.to_string(),
                candidate_modified,
                reference_modified,
            });
        }

        let candidate_lines = match read_lines(&self.candidate, Side::Candidate) {
            Ok(lines) => lines,
            Err(m) => return Some(m),
        };
        let reference_lines = match read_lines(&self.reference, Side::Reference) {
            Ok(lines) => lines,
            Err(m) => return Some(m),
        };

        if candidate_lines.len() != reference_lines.len() {
            return Some(Mismatch::LineCountMismatch {
                file: self.rel.to_string(),
                candidate_lines: candidate_lines.len(),
                reference_lines: reference_lines.len(),
            });
        }

        candidate_lines
            .iter()
            .zip(&reference_lines)
            .position(|(c, r)| c != r)
            .map(|line| Mismatch::LineContentMismatch {
                file: self.rel.to_string(),
                line,
                candidate: candidate_lines[line].clone(),
                reference: reference_lines[line].clone(),
            })
    }
}

fn modified(path: &Path, side: Side) -> Result<std::time::SystemTime, Mismatch> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Mismatch::UnreadableFile {
            path: path.to_path_buf(),
            side,
            error: e.to_string(),
        })
}

/// Read `path` as lines with `\n` and `\r\n` terminators removed.
///
/// Blank lines are kept. A file with no lines at all is an
/// [`Mismatch::EmptyFile`].
fn read_lines(path: &Path, side: Side) -> Result<Vec<String>, Mismatch> {
    let text = fs::read_to_string(path).map_err(|e| Mismatch::UnreadableFile {
        path: path.to_path_buf(),
        side,
        error: e.to_string(),
    })?;

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    if lines.is_empty() {
        return Err(Mismatch::EmptyFile {
            path: path.to_path_buf(),
            side,
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{epoch, set_mtime, write_file};
    use tempfile::TempDir;

    struct Trees {
        _tmp: TempDir,
        candidate: PathBuf,
        reference: PathBuf,
    }

    impl Trees {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let candidate = tmp.path().join("candidate");
            let reference = tmp.path().join("reference");
            fs::create_dir_all(&candidate).unwrap();
            fs::create_dir_all(&reference).unwrap();
            Trees {
                _tmp: tmp,
                candidate,
                reference,
            }
        }

        /// Write the same file on both sides with the candidate one second newer.
        fn pair(&self, rel: &str, candidate: &str, reference: &str) {
            write_file(&self.reference, rel, reference);
            write_file(&self.candidate, rel, candidate);
            set_mtime(&self.reference, rel, epoch(), 0);
            set_mtime(&self.candidate, rel, epoch(), 1);
        }

        fn compare(&self) -> ComparisonOutcome {
            compare(&self.candidate, &self.reference, &GlobLister::default()).unwrap()
        }
    }

    #[test]
    fn test_identical_fresh_trees_pass() {
        let trees = Trees::new();
        trees.pair("a.txt", "one\ntwo\n", "one\ntwo\n");
        trees.pair("sub/b.cmake", "set(X 1)\r\n", "set(X 1)\n");

        let outcome = trees.compare();
        assert!(outcome.passed(), "{:?}", outcome.mismatch);
        assert_eq!(outcome.files_checked, 2);
        assert_eq!(outcome.reason(), None);
    }

    #[test]
    fn test_missing_reported_with_excess_attached() {
        let trees = Trees::new();
        trees.pair("a", "1", "1");
        write_file(&trees.reference, "b", "2");
        write_file(&trees.candidate, "c", "3");

        let outcome = trees.compare();
        assert_eq!(
            outcome.mismatch,
            Some(Mismatch::MissingFiles {
                missing: vec!["b".to_string()],
                excess: vec!["c".to_string()],
            })
        );
        assert_eq!(outcome.files_checked, 0);
    }

    #[test]
    fn test_excess_only() {
        let trees = Trees::new();
        trees.pair("a", "1", "1");
        write_file(&trees.candidate, "extra/log.txt", "3");

        let outcome = trees.compare();
        assert_eq!(
            outcome.mismatch,
            Some(Mismatch::ExcessFiles {
                excess: vec!["extra/log.txt".to_string()],
            })
        );
    }

    #[test]
    fn test_same_mtime_is_stale() {
        let trees = Trees::new();
        trees.pair("a", "1", "1");
        set_mtime(&trees.candidate, "a", epoch(), 0);

        let outcome = trees.compare();
        match outcome.mismatch {
            Some(Mismatch::StaleCandidate {
                ref file,
                candidate_modified,
                reference_modified,
            }) => {
                assert_eq!(file, "a");
                assert_eq!(candidate_modified, reference_modified);
            }
            ref other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_older_candidate_is_stale() {
        let trees = Trees::new();
        trees.pair("a", "1", "1");
        set_mtime(&trees.reference, "a", epoch(), 60);

        assert_eq!(trees.compare().reason(), Some(FailureReason::StaleCandidate));
    }

    #[test]
    fn test_line_content_mismatch_reports_first_index() {
        let trees = Trees::new();
        trees.pair("gen.txt", "a\nx\nc\n", "a\ny\nc\n");

        let outcome = trees.compare();
        assert_eq!(
            outcome.mismatch,
            Some(Mismatch::LineContentMismatch {
                file: "gen.txt".to_string(),
                line: 1,
                candidate: "x".to_string(),
                reference: "y".to_string(),
            })
        );
    }

    #[test]
    fn test_line_count_mismatch() {
        let trees = Trees::new();
        trees.pair("gen.txt", "a\nb\n", "a\nb\nc\n");

        assert_eq!(
            trees.compare().mismatch,
            Some(Mismatch::LineCountMismatch {
                file: "gen.txt".to_string(),
                candidate_lines: 2,
                reference_lines: 3,
            })
        );
    }

    #[test]
    fn test_blank_lines_are_preserved() {
        let trees = Trees::new();
        trees.pair("gen.txt", "a\n\nb\n", "a\nb\n");

        assert_eq!(
            trees.compare().reason(),
            Some(FailureReason::LineCountMismatch)
        );
    }

    #[test]
    fn test_empty_files_fail_even_when_both_empty() {
        let trees = Trees::new();
        trees.pair("empty.txt", "", "");

        match trees.compare().mismatch {
            Some(Mismatch::EmptyFile { path, side }) => {
                assert_eq!(side, Side::Candidate);
                assert_eq!(path, trees.candidate.join("empty.txt"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_is_unreadable() {
        let trees = Trees::new();
        trees.pair("bin.dat", "x", "x");
        fs::write(trees.reference.join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();
        set_mtime(&trees.reference, "bin.dat", epoch(), 0);

        match trees.compare().mismatch {
            Some(Mismatch::UnreadableFile { side, .. }) => assert_eq!(side, Side::Reference),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_first_failure_in_sorted_order_wins() {
        let trees = Trees::new();
        trees.pair("b.txt", "same\n", "same\n");
        trees.pair("a.txt", "one\n", "two\n");
        trees.pair("c.txt", "1\n", "1\n2\n");

        let outcome = trees.compare();
        assert_eq!(outcome.reason(), Some(FailureReason::LineContentMismatch));
        assert_eq!(outcome.files_checked, 0);
    }

    #[test]
    fn test_patterns_restrict_artifacts() {
        let trees = Trees::new();
        trees.pair("proj/CMakeCache.txt", "same\n", "same\n");
        write_file(&trees.candidate, "proj/build.log", "only here");

        let lister = GlobLister::new(&["**/*.txt".to_string()]).unwrap();
        let outcome = compare(&trees.candidate, &trees.reference, &lister).unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.files_checked, 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let trees = Trees::new();
        let err = compare(
            &trees.candidate.join("nope"),
            &trees.reference,
            &GlobLister::default(),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to list artifacts"));
    }

    #[test]
    fn test_custom_lister() {
        struct Fixed(Vec<&'static str>);
        impl ArtifactLister for Fixed {
            fn list(&self, _root: &Path) -> Result<Vec<String>> {
                Ok(self.0.iter().map(|s| s.to_string()).collect())
            }
        }

        let trees = Trees::new();
        trees.pair("z", "1", "1");
        trees.pair("a", "1", "1");
        let snapshot =
            DirectorySnapshot::capture(&trees.candidate, &Fixed(vec!["z", "a", "z"])).unwrap();
        assert_eq!(snapshot.files, ["a", "z"]);

        let outcome = compare(&trees.candidate, &trees.reference, &Fixed(vec!["z", "a"])).unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.files_checked, 2);
    }
}
