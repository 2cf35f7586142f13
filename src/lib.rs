//! presetgen - build preset resolution and artifact verification
//!
//! This crate turns declarative build presets into CMake invocations, runs
//! them once per build configuration, and compares generated artifact trees
//! against reference trees.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when running tests. It provides a
/// recording process executor and preset fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{GenerateError, GeneratorInvocation, PresetRecord};
pub use util::context::GlobalContext;
