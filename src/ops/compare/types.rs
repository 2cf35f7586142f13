//! Public types for the compare module.

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// Output format for comparison results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid output format '{}', valid values: human, json", self.0)
    }
}

impl std::error::Error for OutputFormatParseError {}

/// Root path plus the relative artifact paths found beneath it.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub root: PathBuf,
    /// Sorted, `/`-separated, relative to `root`.
    pub files: Vec<String>,
}

/// Which tree a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Candidate,
    Reference,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Candidate => f.write_str("candidate"),
            Side::Reference => f.write_str("reference"),
        }
    }
}

/// Category of the first failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    MissingFiles,
    ExcessFiles,
    StaleCandidate,
    UnreadableFile,
    EmptyFile,
    LineCountMismatch,
    LineContentMismatch,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingFiles => "missing-files",
            FailureReason::ExcessFiles => "excess-files",
            FailureReason::StaleCandidate => "stale-candidate",
            FailureReason::UnreadableFile => "unreadable-file",
            FailureReason::EmptyFile => "empty-file",
            FailureReason::LineCountMismatch => "line-count-mismatch",
            FailureReason::LineContentMismatch => "line-content-mismatch",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of the first failure found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum Mismatch {
    /// Files present in the reference but not the candidate. Any excess
    /// candidate files are attached.
    MissingFiles {
        missing: Vec<String>,
        excess: Vec<String>,
    },
    /// Files present only in the candidate.
    ExcessFiles { excess: Vec<String> },
    /// Candidate not modified strictly after the reference.
    StaleCandidate {
        file: String,
        #[serde(serialize_with = "serialize_time")]
        candidate_modified: SystemTime,
        #[serde(serialize_with = "serialize_time")]
        reference_modified: SystemTime,
    },
    UnreadableFile {
        path: PathBuf,
        side: Side,
        error: String,
    },
    EmptyFile { path: PathBuf, side: Side },
    LineCountMismatch {
        file: String,
        candidate_lines: usize,
        reference_lines: usize,
    },
    /// First differing line, zero-based.
    LineContentMismatch {
        file: String,
        line: usize,
        candidate: String,
        reference: String,
    },
}

impl Mismatch {
    pub fn reason(&self) -> FailureReason {
        match self {
            Mismatch::MissingFiles { .. } => FailureReason::MissingFiles,
            Mismatch::ExcessFiles { .. } => FailureReason::ExcessFiles,
            Mismatch::StaleCandidate { .. } => FailureReason::StaleCandidate,
            Mismatch::UnreadableFile { .. } => FailureReason::UnreadableFile,
            Mismatch::EmptyFile { .. } => FailureReason::EmptyFile,
            Mismatch::LineCountMismatch { .. } => FailureReason::LineCountMismatch,
            Mismatch::LineContentMismatch { .. } => FailureReason::LineContentMismatch,
        }
    }
}

/// Verdict of comparing a candidate tree against a reference tree.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub candidate: PathBuf,
    pub reference: PathBuf,

    /// Pairs that passed every check before the first failure.
    pub files_checked: usize,

    /// `None` when the trees match.
    pub mismatch: Option<Mismatch>,
}

impl ComparisonOutcome {
    pub fn passed(&self) -> bool {
        self.mismatch.is_none()
    }

    pub fn reason(&self) -> Option<FailureReason> {
        self.mismatch.as_ref().map(Mismatch::reason)
    }
}

/// Render a timestamp as RFC 3339 in UTC, falling back to seconds since the
/// epoch when the value is out of range.
pub fn format_time(t: SystemTime) -> String {
    let (seconds, offset) = match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(after) => (
            i128::from(after.as_secs()),
            Duration::try_from(after).ok(),
        ),
        Err(e) => (
            -i128::from(e.duration().as_secs()),
            Duration::try_from(e.duration()).ok().map(|d| -d),
        ),
    };

    offset
        .and_then(|d| OffsetDateTime::UNIX_EPOCH.checked_add(d))
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{}s", seconds))
}

fn serialize_time<S>(t: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_time(*t))
}
