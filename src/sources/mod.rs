//! Where presets come from.

pub mod store;

pub use store::{PresetEntry, PresetStore, DEFAULT_PRESETS_DIR};
