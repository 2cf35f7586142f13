//! Test utilities and mocks for unit tests.
//!
//! Provides a recording process executor, preset fixtures and helpers for
//! laying out artifact trees with controlled modification times.
//!
//! # Example
//!
//! ```rust,ignore
//! use presetgen::test_support::{MockExecutor, PresetFixture};
//!
//! #[test]
//! fn test_example() {
//!     let preset = PresetFixture::new("linux", "linux", "clang").parse();
//!     let mut exec = MockExecutor::with_codes([Some(0), Some(1)]);
//!     // Hand `exec` to an InvocationRunner...
//! }
//! ```

pub mod fixtures;

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;

use crate::util::process::{Executor, ProcessBuilder};

pub use fixtures::*;

/// Mock process executor.
///
/// Records every command it is asked to run and answers with scripted exit
/// codes, falling back to a default once the script is exhausted.
#[derive(Debug, Default)]
pub struct MockExecutor {
    codes: VecDeque<Option<i32>>,
    default_code: Option<i32>,
    /// Commands in the order they were run.
    pub calls: Vec<ProcessBuilder>,
}

impl MockExecutor {
    /// Every command exits with code 0.
    pub fn succeeding() -> Self {
        MockExecutor {
            codes: VecDeque::new(),
            default_code: Some(0),
            calls: Vec::new(),
        }
    }

    /// Answer with `codes` in order, then exit 0.
    pub fn with_codes(codes: impl IntoIterator<Item = Option<i32>>) -> Self {
        MockExecutor {
            codes: codes.into_iter().collect(),
            default_code: Some(0),
            calls: Vec::new(),
        }
    }

    /// Rendered command lines of every call.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.iter().map(ProcessBuilder::display_command).collect()
    }
}

impl Executor for MockExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        self.calls.push(cmd.clone());
        Ok(self.codes.pop_front().unwrap_or(self.default_code))
    }
}

/// Write `contents` to `root/rel`, creating parents.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
}

/// Set the modification time of `root/rel` to `base + offset_secs`.
pub fn set_mtime(root: &Path, rel: &str, base: SystemTime, offset_secs: u64) {
    let file = fs::OpenOptions::new()
        .write(true)
        .open(root.join(rel))
        .unwrap();
    file.set_modified(base + Duration::from_secs(offset_secs))
        .unwrap();
}

/// A fixed, whole-second point in time, so filesystems with coarse
/// timestamps compare the same way as fine-grained ones.
pub fn epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_scripted_codes() {
        let mut exec = MockExecutor::with_codes([Some(2), None]);
        let cmd = ProcessBuilder::new("cmake").arg("/src");

        assert_eq!(exec.run(&cmd).unwrap(), Some(2));
        assert_eq!(exec.run(&cmd).unwrap(), None);
        assert_eq!(exec.run(&cmd).unwrap(), Some(0));
        assert_eq!(exec.command_lines(), vec!["cmake /src"; 3]);
    }

    #[test]
    fn test_set_mtime() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_file(tmp.path(), "a/b.txt", "x");
        set_mtime(tmp.path(), "a/b.txt", epoch(), 10);

        let modified = fs::metadata(tmp.path().join("a/b.txt"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(modified, epoch() + Duration::from_secs(10));
    }
}
