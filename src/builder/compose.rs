//! Composition of a full CMake invocation from a preset.

use std::path::{Path, PathBuf};

use crate::builder::policy::platform_flags;
use crate::core::errors::GenerateError;
use crate::core::invocation::{Flag, GeneratorInvocation};
use crate::core::platform::{Compiler, TargetPlatform};
use crate::core::preset::{CMakeParam, CMakeSwitch, PresetRecord};
use crate::util::env::{
    Environment, GENERATE_SOURCE_DISTRO, PHYSX_ROOT_DIR, PM_CMAKE_PATH, PM_CUDA_PATH, PM_PATHS,
    VS150_CL_PATH,
};

/// Params whose value is a path relative to the project root.
pub const ROOT_RELATIVE_PARAMS: &[&str] = &[
    "CMAKE_INSTALL_PREFIX",
    "PX_OUTPUT_LIB_DIR",
    "PX_OUTPUT_EXE_DIR",
    "PX_OUTPUT_DLL_DIR",
];

/// Param passed through verbatim, quoted.
pub const ANDROID_ABI_PARAM: &str = "ANDROID_ABI";

/// Switch that turns on the CUDA projects.
pub const GPU_PROJECTS_SWITCH: &str = "PX_GENERATE_GPU_PROJECTS";

/// Composes [`GeneratorInvocation`]s against one environment snapshot.
#[derive(Debug, Clone)]
pub struct InvocationComposer<'a> {
    env: &'a Environment,
    cmake_override: Option<PathBuf>,
}

impl<'a> InvocationComposer<'a> {
    pub fn new(env: &'a Environment) -> Self {
        InvocationComposer {
            env,
            cmake_override: None,
        }
    }

    /// Use this CMake executable regardless of the environment.
    pub fn with_cmake(mut self, cmake: Option<PathBuf>) -> Self {
        self.cmake_override = cmake;
        self
    }

    /// Resolve a preset into the invocation that generates its build trees.
    ///
    /// Definitions are ordered platform flags, common flags, switches, then
    /// params. Identical inputs always produce identical ordering.
    pub fn compose(&self, preset: &PresetRecord) -> Result<GeneratorInvocation, GenerateError> {
        let root = PathBuf::from(self.env.require(PHYSX_ROOT_DIR)?);

        let platform = platform_flags(preset.target_platform(), preset.compiler(), self.env)?;

        let mut definitions = platform.flags;
        definitions.extend(common_flags(self.env)?);
        definitions.extend(switch_flags(preset.switches(), preset.compiler(), self.env));
        definitions.extend(param_flags(preset.params(), &root));

        let (executable, launcher_args) = self.executable(preset.target_platform());
        tracing::debug!("Cmake: {}", executable.display());

        Ok(GeneratorInvocation::new(
            preset.name(),
            preset.target_platform(),
            executable,
            launcher_args,
            platform.generator,
            definitions,
            &root,
        ))
    }

    fn executable(&self, target: TargetPlatform) -> (PathBuf, Vec<String>) {
        if let Some(ref cmake) = self.cmake_override {
            return (cmake.clone(), Vec::new());
        }
        if let Some(cmake_root) = self.env.get(PM_CMAKE_PATH) {
            let exe = format!("cmake{}", std::env::consts::EXE_SUFFIX);
            return (Path::new(cmake_root).join("bin").join(exe), Vec::new());
        }
        let cmake = format!("cmake{}", std::env::consts::EXE_SUFFIX);
        match target {
            TargetPlatform::Emscripten => (PathBuf::from("emcmake"), vec![cmake]),
            _ => (PathBuf::from(cmake), Vec::new()),
        }
    }
}

/// Flags applied to every preset.
pub fn common_flags(env: &Environment) -> Result<Vec<Flag>, GenerateError> {
    let root = env.require(PHYSX_ROOT_DIR)?;

    let mut flags = vec![
        Flag::Raw("--no-warn-unused-cli".into()),
        Flag::quoted("CMAKE_PREFIX_PATH", env.require(PM_PATHS)?),
        Flag::quoted("PHYSX_ROOT_DIR", root),
        Flag::quoted("PX_OUTPUT_LIB_DIR", root),
        Flag::quoted("PX_OUTPUT_BIN_DIR", root),
    ];
    if env.get(GENERATE_SOURCE_DISTRO) == Some("1") {
        flags.push(Flag::define("PX_GENERATE_SOURCE_DISTRO", "1"));
    }
    Ok(flags)
}

/// `-D<NAME>=<VALUE>` with the value upper-cased, plus CUDA paths after the
/// GPU projects switch or any switch whose name extends it.
///
/// Missing CUDA variables leave their flag out; they never fail.
pub fn switch_flags(switches: &[CMakeSwitch], compiler: &Compiler, env: &Environment) -> Vec<Flag> {
    let mut flags = Vec::with_capacity(switches.len());

    for switch in switches {
        flags.push(Flag::define(&switch.name, switch.value.to_uppercase()));

        if !switch.name.contains(GPU_PROJECTS_SWITCH) {
            continue;
        }
        match env.get(PM_CUDA_PATH) {
            Some(cuda) => flags.push(Flag::define("CUDA_TOOLKIT_ROOT_DIR", cuda)),
            None => tracing::warn!(
                "{} is not set; CUDA_TOOLKIT_ROOT_DIR left to cmake discovery",
                PM_CUDA_PATH
            ),
        }
        if *compiler == Compiler::Vc15 {
            match env.get(VS150_CL_PATH) {
                Some(cl) => {
                    tracing::info!("VS15CL: {}", cl);
                    flags.push(Flag::define("CUDA_HOST_COMPILER", cl));
                }
                None => tracing::warn!(
                    "{} is not set; CUDA_HOST_COMPILER left to cmake discovery",
                    VS150_CL_PATH
                ),
            }
        }
    }

    flags
}

/// `-D<NAME>=<VALUE>`, resolving root-relative output paths.
pub fn param_flags(params: &[CMakeParam], root: &Path) -> Vec<Flag> {
    params
        .iter()
        .map(|param| {
            if ROOT_RELATIVE_PARAMS.contains(&param.name.as_str()) {
                Flag::quoted(&param.name, format!("{}/{}", root.display(), param.value))
            } else if param.name == ANDROID_ABI_PARAM {
                Flag::quoted(&param.name, &param.value)
            } else {
                Flag::define(&param.name, &param.value)
            }
        })
        .collect()
}
