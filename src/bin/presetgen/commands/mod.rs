//! Command implementations

pub mod compare;
pub mod completions;
pub mod generate;
pub mod list;
pub mod show;
