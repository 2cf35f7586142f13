//! Regenerates build trees by running CMake for each output directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::errors::GenerateError;
use crate::core::invocation::{BuildConfiguration, GeneratorInvocation};
use crate::util::fs::recreate_dir;
use crate::util::process::{Executor, ProcessBuilder};

/// One generated build tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTree {
    pub path: PathBuf,
    pub config: Option<BuildConfiguration>,
}

/// Runs a [`GeneratorInvocation`] against a project root.
pub struct InvocationRunner<E> {
    root: PathBuf,
    executor: E,
}

impl<E: Executor> InvocationRunner<E> {
    pub fn new(root: impl Into<PathBuf>, executor: E) -> Self {
        InvocationRunner {
            root: root.into(),
            executor,
        }
    }

    /// The CMake source directory: `compiler/internal` when it holds a
    /// `CMakeLists.txt`, otherwise `compiler/public`.
    pub fn source_dir(&self) -> PathBuf {
        master_source_dir(&self.root)
    }

    /// Clean, recreate and configure every output directory, in order.
    ///
    /// Stops at the first configuration whose CMake run exits non-zero.
    pub fn run(&mut self, invocation: &GeneratorInvocation) -> Result<Vec<GeneratedTree>> {
        let source_dir = self.source_dir();
        let mut generated = Vec::with_capacity(invocation.output_directories().len());

        for output in invocation.output_directories() {
            recreate_dir(&output.path)?;

            match output.config {
                Some(config) => tracing::info!(
                    "Generating {} ({}) in {}",
                    invocation.preset(),
                    config,
                    output.path.display()
                ),
                None => tracing::info!(
                    "Generating {} in {}",
                    invocation.preset(),
                    output.path.display()
                ),
            }
            tracing::debug!("{}", invocation.command_line(&source_dir, output));

            let cmd = ProcessBuilder::new(invocation.executable())
                .args(invocation.args_for(&source_dir, output))
                .cwd(&output.path);

            let code = self.executor.run(&cmd)?;
            if code != Some(0) {
                return Err(GenerateError::GenerationFailed {
                    config: output.config,
                    code,
                }
                .into());
            }

            generated.push(GeneratedTree {
                path: output.path.clone(),
                config: output.config,
            });
        }

        Ok(generated)
    }

    /// Consume the runner, returning the executor.
    pub fn into_executor(self) -> E {
        self.executor
    }
}

/// Select the master CMake directory under `<root>/compiler`.
pub fn master_source_dir(root: &Path) -> PathBuf {
    let compiler = root.join("compiler");
    if compiler.join("internal").join("CMakeLists.txt").is_file() {
        compiler.join("internal")
    } else {
        compiler.join("public")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invocation::{Flag, Generator};
    use crate::core::platform::TargetPlatform;
    use crate::test_support::MockExecutor;
    use tempfile::TempDir;

    fn invocation(root: &Path, platform: TargetPlatform) -> GeneratorInvocation {
        GeneratorInvocation::new(
            "preset",
            platform,
            PathBuf::from("cmake"),
            Vec::new(),
            Some(Generator::UnixMakefiles),
            vec![Flag::define("PX_BUILDSNIPPETS", "TRUE")],
            root,
        )
    }

    #[test]
    fn test_master_dir_prefers_internal() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(master_source_dir(tmp.path()), tmp.path().join("compiler/public"));

        let internal = tmp.path().join("compiler/internal");
        std::fs::create_dir_all(&internal).unwrap();
        assert_eq!(master_source_dir(tmp.path()), tmp.path().join("compiler/public"));

        std::fs::write(internal.join("CMakeLists.txt"), "project(x)").unwrap();
        assert_eq!(master_source_dir(tmp.path()), internal);
    }

    #[test]
    fn test_single_config_runs_once_per_configuration() {
        let tmp = TempDir::new().unwrap();
        let inv = invocation(tmp.path(), TargetPlatform::Linux);

        let mut runner = InvocationRunner::new(tmp.path(), MockExecutor::succeeding());
        let trees = runner.run(&inv).unwrap();

        let configs: Vec<_> = trees.iter().filter_map(|t| t.config).collect();
        assert_eq!(configs, BuildConfiguration::ALL);

        let calls = runner.into_executor().calls;
        assert_eq!(calls.len(), 4);
        for (call, config) in calls.iter().zip(BuildConfiguration::ALL) {
            let build_type = format!("-DCMAKE_BUILD_TYPE={}", config);
            assert_eq!(call.get_args().last(), Some(&build_type));
            assert_eq!(
                call.get_args().iter().filter(|a| a.starts_with("-DCMAKE_BUILD_TYPE")).count(),
                1
            );
            assert_eq!(
                call.get_cwd(),
                Some(tmp.path().join(format!("compiler/preset-{}", config)).as_path())
            );
            assert_eq!(call.get_args()[0], tmp.path().join("compiler/public").display().to_string());
        }
    }

    #[test]
    fn test_multi_config_runs_once() {
        let tmp = TempDir::new().unwrap();
        let inv = invocation(tmp.path(), TargetPlatform::Win64);

        let mut runner = InvocationRunner::new(tmp.path(), MockExecutor::succeeding());
        let trees = runner.run(&inv).unwrap();

        assert_eq!(trees.len(), 1);
        assert!(trees[0].path.is_dir());
        let calls = runner.into_executor().calls;
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].get_args().iter().any(|a| a.starts_with("-DCMAKE_BUILD_TYPE")));
    }

    #[test]
    fn test_output_directory_is_cleaned() {
        let tmp = TempDir::new().unwrap();
        let inv = invocation(tmp.path(), TargetPlatform::Mac64);
        let stale = tmp.path().join("compiler/preset/CMakeCache.txt");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "stale").unwrap();

        let mut runner = InvocationRunner::new(tmp.path(), MockExecutor::succeeding());
        runner.run(&inv).unwrap();

        assert!(!stale.exists());
        assert!(tmp.path().join("compiler/preset").is_dir());
    }

    #[test]
    fn test_failure_halts_remaining_configurations() {
        let tmp = TempDir::new().unwrap();
        let inv = invocation(tmp.path(), TargetPlatform::Linux);

        let executor = MockExecutor::with_codes([Some(0), Some(1)]);
        let mut runner = InvocationRunner::new(tmp.path(), executor);
        let err = runner.run(&inv).unwrap_err();

        match err.downcast_ref::<GenerateError>() {
            Some(GenerateError::GenerationFailed { config, code }) => {
                assert_eq!(*config, Some(BuildConfiguration::Checked));
                assert_eq!(*code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(runner.into_executor().calls.len(), 2);
        assert!(!tmp.path().join("compiler/preset-profile").exists());
    }
}
