//! Running external tools.
//!
//! Commands are described by a [`ProcessBuilder`] and handed to an
//! [`Executor`], so generation can be exercised without spawning CMake.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// A command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessBuilder {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory of the child. The parent's own working directory
    /// is never changed.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Spawn with inherited stdio and block until exit. `None` means the
    /// child was killed by a signal.
    pub fn status(&self) -> Result<Option<i32>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .with_context(|| format!("failed to run `{}`", self.display_command()))?;
        Ok(status.code())
    }

    /// The command as a user would type it. Words containing whitespace are
    /// double-quoted.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .map(|word| {
                if word.contains(char::is_whitespace) {
                    format!("\"{}\"", word)
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs processes. Tests swap in a recording implementation.
pub trait Executor {
    /// Run to completion and return the exit code (`None` if killed).
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<Option<i32>>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        (**self).run(cmd)
    }
}

/// Spawns real child processes, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        tracing::debug!("Running `{}`", cmd.display_command());
        cmd.status()
    }
}

/// Look `name` up on `PATH`.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}
