//! Global context for presetgen operations.
//!
//! Provides centralized access to the project root, the host, the captured
//! environment and configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::platform::HostPlatform;
use crate::sources::PresetStore;
use crate::util::config::Config;
use crate::util::env::{Environment, PHYSX_ROOT_DIR};

/// Global context shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project root
    root: PathBuf,

    /// Host the generator runs on
    host: HostPlatform,

    /// Environment snapshot taken at startup
    env: Environment,

    /// Project configuration
    config: Config,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a context from the current process.
    ///
    /// The root is `root_override` if given, else `PHYSX_ROOT_DIR`, else the
    /// current directory.
    pub fn new(root_override: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_env(
            root_override,
            Environment::from_process(),
            &cwd,
        ))
    }

    /// Create a context from an explicit environment snapshot.
    ///
    /// An explicit root replaces `PHYSX_ROOT_DIR` in the snapshot so that
    /// composed invocations point at the same tree.
    pub fn with_env(root_override: Option<PathBuf>, mut env: Environment, cwd: &Path) -> Self {
        let root = match root_override {
            Some(root) => {
                let root = cwd.join(root);
                env.set(PHYSX_ROOT_DIR, root.display().to_string());
                root
            }
            None => env
                .get(PHYSX_ROOT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| cwd.to_path_buf()),
        };
        let config = Config::for_root(&root);

        GlobalContext {
            root,
            host: HostPlatform::current(),
            env,
            config,
            verbose: false,
            color: true,
        }
    }

    /// Pretend to run on `host`.
    pub fn with_host(mut self, host: HostPlatform) -> Self {
        self.host = host;
        self
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color mode.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn host(&self) -> HostPlatform {
        self.host
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// The project's preset store.
    pub fn preset_store(&self) -> PresetStore {
        PresetStore::new(&self.root, &self.config.presets.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_from_environment() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::default().with(PHYSX_ROOT_DIR, tmp.path().display().to_string());

        let ctx = GlobalContext::with_env(None, env, Path::new("/elsewhere"));
        assert_eq!(ctx.root(), tmp.path());
    }

    #[test]
    fn test_root_falls_back_to_cwd() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_env(None, Environment::default(), tmp.path());
        assert_eq!(ctx.root(), tmp.path());
        assert_eq!(ctx.env().get(PHYSX_ROOT_DIR), None);
    }

    #[test]
    fn test_explicit_root_overrides_environment() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::default().with(PHYSX_ROOT_DIR, "/from/env");

        let ctx = GlobalContext::with_env(Some(PathBuf::from("physx")), env, tmp.path());
        let expected = tmp.path().join("physx");
        assert_eq!(ctx.root(), expected);
        assert_eq!(
            ctx.env().get(PHYSX_ROOT_DIR),
            Some(expected.display().to_string().as_str())
        );
    }

    #[test]
    fn test_config_read_from_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("presetgen.toml"),
            "[presets]\ndir = \"presets\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_env(Some(tmp.path().to_path_buf()), Environment::default(), tmp.path());
        assert_eq!(ctx.preset_store().internal_dir(), tmp.path().join("presets"));
        assert_eq!(ctx.preset_store().public_dir(), tmp.path().join("presets/public"));
    }
}
