//! `presetgen compare` command

use anyhow::{Context, Result};

use crate::cli::CompareArgs;
use crate::Exit;
use presetgen::ops::compare::{compare, format_outcome_for_output, GlobLister, OutputFormat};
use presetgen::util::GlobalContext;

pub fn execute(args: CompareArgs, ctx: &GlobalContext) -> Result<Exit> {
    let output_format: OutputFormat = args
        .output_format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.output_format))?;

    let patterns = if args.patterns.is_empty() {
        ctx.config().compare.patterns.clone()
    } else {
        args.patterns
    };
    let lister = GlobLister::new(&patterns)?;

    let outcome = compare(&args.candidate, &args.reference, &lister)?;

    print!("{}", format_outcome_for_output(&outcome, output_format));
    if output_format == OutputFormat::Json {
        println!();
    }

    // Exit with error code if the trees differ
    if outcome.passed() {
        Ok(Exit::Success)
    } else {
        Ok(Exit::Failure)
    }
}
