//! `presetgen generate` command

use std::io;

use anyhow::Result;

use crate::cli::GenerateArgs;
use crate::Exit;
use presetgen::ops::{generate, relaunch, select_preset, GenerateOptions, GenerateOutcome};
use presetgen::util::diagnostic::{emit, suggestions};
use presetgen::util::process::SystemExecutor;
use presetgen::util::{Diagnostic, GlobalContext};

pub fn execute(args: GenerateArgs, ctx: &GlobalContext) -> Result<Exit> {
    let opts = GenerateOptions { cmake: args.cmake };

    let Some(preset) = args.preset else {
        // No preset: pick one and hand it back to the top-level script,
        // which sets up the environment before calling us again.
        let presets = ctx.preset_store().list_eligible(ctx.host())?;
        let chosen = select_preset(&presets, &mut io::stdin().lock(), &mut io::stdout())?;
        relaunch(ctx, &chosen.name, SystemExecutor)?;
        return Ok(Exit::Success);
    };

    match generate(ctx, &preset, &opts, SystemExecutor)? {
        GenerateOutcome::Generated(trees) => {
            for tree in &trees {
                match tree.config {
                    Some(config) => println!("  Generated {} ({})", tree.path.display(), config),
                    None => println!("  Generated {}", tree.path.display()),
                }
            }
            Ok(Exit::Success)
        }
        GenerateOutcome::Ineligible { preset, .. } => {
            let diag = Diagnostic::warning(format!(
                "preset `{}` is not supported on this build platform",
                preset
            ))
            .with_suggestion(suggestions::WRONG_HOST)
            .with_suggestion(suggestions::LIST_PRESETS);
            emit(&diag, ctx.color());
            Ok(Exit::Unsupported)
        }
    }
}
