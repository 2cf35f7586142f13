//! Core data structures.
//!
//! This module contains the foundational types:
//! - Target platforms, compilers and the host filter
//! - Preset records parsed from XML
//! - Generator invocations and their output layout
//! - Resolution and generation errors

pub mod errors;
pub mod invocation;
pub mod platform;
pub mod preset;

pub use errors::GenerateError;
pub use invocation::{BuildConfiguration, Flag, Generator, GeneratorInvocation, OutputDirectory};
pub use platform::{Compiler, HostPlatform, TargetPlatform};
pub use preset::{CMakeParam, CMakeSwitch, PresetRecord};
