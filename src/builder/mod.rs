//! CMake invocation building and execution.
//!
//! `policy` maps a target platform and compiler to generator flags,
//! `compose` turns a preset into a full invocation, and `runner` executes it.

pub mod compose;
pub mod policy;
pub mod runner;

pub use compose::InvocationComposer;
pub use policy::{platform_flags, PlatformFlags};
pub use runner::{master_source_dir, GeneratedTree, InvocationRunner};
