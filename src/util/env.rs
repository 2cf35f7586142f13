//! Snapshot of the environment variables the generator consumes.
//!
//! Variables are captured once and passed down explicitly, so resolution
//! never reads the process environment behind the caller's back.

use std::collections::BTreeMap;

use crate::core::errors::GenerateError;

/// Project root directory.
pub const PHYSX_ROOT_DIR: &str = "PHYSX_ROOT_DIR";
/// Dependency-manager package roots, `;`-separated.
pub const PM_PATHS: &str = "PM_PATHS";
/// CMake modules package (toolchain files).
pub const PM_CMAKE_MODULES_PATH: &str = "PM_CMakeModules_PATH";
/// CMake package; when set its `bin/cmake` is used.
pub const PM_CMAKE_PATH: &str = "PM_cmake_PATH";
/// CUDA toolkit root.
pub const PM_CUDA_PATH: &str = "PM_CUDA_PATH";
/// `cl.exe` directory of Visual Studio 2017, used as the CUDA host compiler.
pub const VS150_CL_PATH: &str = "VS150CLPATH";
/// Visual Studio 2017 install directory.
pub const VS150_PATH: &str = "VS150PATH";
/// Android NDK root.
pub const PM_ANDROID_NDK_PATH: &str = "PM_AndroidNDK_PATH";
/// Clang package root.
pub const PM_CLANG_PATH: &str = "PM_clang_PATH";
/// Emscripten SDK root.
pub const EMSCRIPTEN: &str = "EMSCRIPTEN";
/// `1` to generate a source distribution.
pub const GENERATE_SOURCE_DISTRO: &str = "GENERATE_SOURCE_DISTRO";

/// Every variable read by preset resolution.
pub const CONSUMED: &[&str] = &[
    PHYSX_ROOT_DIR,
    PM_PATHS,
    PM_CMAKE_MODULES_PATH,
    PM_CMAKE_PATH,
    PM_CUDA_PATH,
    VS150_CL_PATH,
    VS150_PATH,
    PM_ANDROID_NDK_PATH,
    PM_CLANG_PATH,
    EMSCRIPTEN,
    GENERATE_SOURCE_DISTRO,
];

/// Captured environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the consumed variables from the current process.
    pub fn from_process() -> Self {
        CONSUMED
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value)))
            .collect()
    }

    /// Get a variable, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a variable that the current platform branch cannot do without.
    pub fn require(&self, key: &str) -> Result<&str, GenerateError> {
        self.get(key).ok_or_else(|| GenerateError::missing_env(key))
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Builder-style [`Environment::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate over captured variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Environment {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
