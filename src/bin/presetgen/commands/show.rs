//! `presetgen show` command
//!
//! Resolves a preset and prints the command line for every output
//! directory without touching the filesystem.

use anyhow::Result;

use crate::cli::ShowArgs;
use crate::Exit;
use presetgen::builder::master_source_dir;
use presetgen::ops::{resolve_invocation, GenerateOptions};
use presetgen::util::GlobalContext;

pub fn execute(args: ShowArgs, ctx: &GlobalContext) -> Result<Exit> {
    let opts = GenerateOptions { cmake: args.cmake };
    let invocation = resolve_invocation(ctx, &args.preset, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&invocation)?);
        return Ok(Exit::Success);
    }

    let source_dir = master_source_dir(ctx.root());
    println!(
        "{} ({}, {})",
        invocation.preset(),
        invocation.target_platform(),
        if invocation.is_multi_config() {
            "multi-config"
        } else {
            "single-config"
        }
    );
    for output in invocation.output_directories() {
        println!();
        match output.config {
            Some(config) => println!("[{}] {}", config, output.path.display()),
            None => println!("{}", output.path.display()),
        }
        println!("  {}", invocation.command_line(&source_dir, output));
    }

    Ok(Exit::Success)
}
