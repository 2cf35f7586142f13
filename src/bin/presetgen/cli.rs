//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// presetgen - resolve build presets into CMake invocations and verify
/// generated artifact trees
#[derive(Parser)]
#[command(name = "presetgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to PHYSX_ROOT_DIR, then the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate build trees for a preset, or pick one from a menu
    Generate(GenerateArgs),

    /// List the presets available on this host
    List(ListArgs),

    /// Show the CMake command lines a preset resolves to
    Show(ShowArgs),

    /// Compare a generated artifact tree against a reference tree
    Compare(CompareArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Preset name; prompts with a menu when omitted
    pub preset: Option<String>,

    /// CMake executable to run
    #[arg(long, value_name = "PATH")]
    pub cmake: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Include presets for other hosts
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Preset name
    pub preset: String,

    /// CMake executable to show
    #[arg(long, value_name = "PATH")]
    pub cmake: Option<PathBuf>,

    /// Print the invocation as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Freshly generated tree
    pub candidate: PathBuf,

    /// Known-good tree
    pub reference: PathBuf,

    /// Glob selecting artifact files (repeatable; defaults to config or `**/*`)
    #[arg(long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Output format: human, json
    #[arg(long = "format", default_value = "human")]
    pub output_format: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
