//! High-level operations.
//!
//! This module contains the implementation of presetgen commands.

pub mod compare;
pub mod generate;
pub mod select;

pub use compare::{compare, ComparisonOutcome, GlobLister, OutputFormat};
pub use generate::{generate, relaunch, resolve_invocation, GenerateOptions, GenerateOutcome};
pub use select::select_preset;
