//! Implementation of `presetgen generate`.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::{GeneratedTree, InvocationComposer, InvocationRunner};
use crate::core::invocation::GeneratorInvocation;
use crate::core::platform::{is_preset_eligible, HostPlatform};
use crate::util::env::{PM_CMAKE_MODULES_PATH, PM_PATHS};
use crate::util::process::{find_executable, Executor, ProcessBuilder};
use crate::util::GlobalContext;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// CMake executable from the command line; beats the config file
    pub cmake: Option<PathBuf>,
}

/// Result of a generate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Every build tree was generated.
    Generated(Vec<GeneratedTree>),
    /// The preset is not generated from this kind of host.
    Ineligible { preset: String, host: HostPlatform },
}

/// Resolve a preset into its invocation without running anything.
pub fn resolve_invocation(
    ctx: &GlobalContext,
    preset: &str,
    opts: &GenerateOptions,
) -> Result<GeneratorInvocation> {
    let record = ctx.preset_store().resolve(preset)?;

    let cmake = opts
        .cmake
        .clone()
        .or_else(|| ctx.config().generate.cmake.clone());
    let invocation = InvocationComposer::new(ctx.env())
        .with_cmake(cmake)
        .compose(&record)?;

    Ok(invocation)
}

/// Resolve `preset` and regenerate all of its build trees.
pub fn generate<E: Executor>(
    ctx: &GlobalContext,
    preset: &str,
    opts: &GenerateOptions,
    executor: E,
) -> Result<GenerateOutcome> {
    if !is_preset_eligible(preset, ctx.host()) {
        tracing::debug!("Preset not supported on this build platform: {}", preset);
        return Ok(GenerateOutcome::Ineligible {
            preset: preset.to_string(),
            host: ctx.host(),
        });
    }

    for var in [PM_CMAKE_MODULES_PATH, PM_PATHS] {
        if let Some(value) = ctx.env().get(var) {
            tracing::info!("{}: {}", var, value);
        }
    }

    let invocation = resolve_invocation(ctx, preset, opts)?;

    let exe = invocation.executable();
    if exe.components().count() == 1 && find_executable(exe).is_none() {
        tracing::warn!("{} was not found in PATH", exe.display());
    }

    let mut runner = InvocationRunner::new(ctx.root(), executor);
    let trees = runner.run(&invocation)?;
    Ok(GenerateOutcome::Generated(trees))
}

/// Run the host's top-level generate script from the project root with
/// the chosen preset.
pub fn relaunch<E: Executor>(ctx: &GlobalContext, preset: &str, mut executor: E) -> Result<()> {
    // Spawned by full path: Windows does not search the child's cwd.
    let script = ctx.root().join(ctx.host().generate_script());
    let cmd = ProcessBuilder::new(script).arg(preset).cwd(ctx.root());

    tracing::info!("Running {}", cmd.display_command());
    match executor.run(&cmd)? {
        Some(0) => Ok(()),
        Some(code) => bail!("`{}` exited with code {}", cmd.display_command(), code),
        None => bail!("`{}` was terminated by a signal", cmd.display_command()),
    }
}
