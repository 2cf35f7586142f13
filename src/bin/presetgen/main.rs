//! presetgen CLI - resolve build presets into CMake runs and verify
//! generated artifacts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use presetgen::core::errors::GenerateError;
use presetgen::util::diagnostic::emit;
use presetgen::util::GlobalContext;

/// Process exit status of a command that completed.
pub enum Exit {
    Success,
    /// The command ran but its check failed.
    Failure,
    /// The preset is not generated on this host.
    Unsupported,
}

impl Exit {
    fn code(&self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Unsupported => 2,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    match run(cli) {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            report(&e, color);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Exit> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("presetgen=debug")
    } else {
        EnvFilter::new("presetgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let context = |root: Option<PathBuf>| -> Result<GlobalContext> {
        let mut ctx = GlobalContext::new(root)?;
        ctx.set_verbose(cli.verbose);
        ctx.set_color(!cli.no_color);
        Ok(ctx)
    };

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &context(cli.root.clone())?),
        Commands::List(args) => commands::list::execute(args, &context(cli.root.clone())?),
        Commands::Show(args) => commands::show::execute(args, &context(cli.root.clone())?),
        Commands::Compare(args) => commands::compare::execute(args, &context(cli.root.clone())?),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, using the structured diagnostic when there is one.
fn report(err: &anyhow::Error, color: bool) {
    match err.downcast_ref::<GenerateError>() {
        Some(GenerateError::InvalidPreset(syntax)) => eprint!("{}", syntax.render()),
        Some(generate) => emit(&generate.to_diagnostic(), color),
        None => eprintln!("error: {:#}", err),
    }
}
