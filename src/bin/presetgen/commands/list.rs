//! `presetgen list` command

use anyhow::Result;

use crate::cli::ListArgs;
use crate::Exit;
use presetgen::util::GlobalContext;

pub fn execute(args: ListArgs, ctx: &GlobalContext) -> Result<Exit> {
    let store = ctx.preset_store();
    let presets = if args.all {
        store.list()?
    } else {
        store.list_eligible(ctx.host())?
    };

    if presets.is_empty() {
        println!("No presets found in {}", store.internal_dir().display());
        return Ok(Exit::Success);
    }

    let width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for preset in &presets {
        match preset.comment.as_deref() {
            Some(comment) => println!("{:<width$}  {}", preset.name, comment, width = width),
            None => println!("{}", preset.name),
        }
        if ctx.is_verbose() {
            println!("{:<width$}  ({})", "", preset.path.display(), width = width);
        }
    }

    Ok(Exit::Success)
}
