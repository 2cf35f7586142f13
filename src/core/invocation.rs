//! The resolved CMake invocation for a preset.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::platform::TargetPlatform;

/// Build configurations, in the order single-config trees are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    Debug,
    Checked,
    Profile,
    Release,
}

impl BuildConfiguration {
    pub const ALL: [BuildConfiguration; 4] = [
        BuildConfiguration::Debug,
        BuildConfiguration::Checked,
        BuildConfiguration::Profile,
        BuildConfiguration::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Checked => "checked",
            BuildConfiguration::Profile => "profile",
            BuildConfiguration::Release => "release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake generator selected with `-G`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Generator {
    VisualStudio { version: u8, year: u16 },
    Xcode,
    UnixMakefiles,
    MinGwMakefiles,
}

impl Generator {
    /// The generator name as CMake spells it.
    pub fn name(&self) -> String {
        match self {
            Generator::VisualStudio { version, year } => {
                format!("Visual Studio {} {}", version, year)
            }
            Generator::Xcode => "Xcode".to_string(),
            Generator::UnixMakefiles => "Unix Makefiles".to_string(),
            Generator::MinGwMakefiles => "MinGW Makefiles".to_string(),
        }
    }
}

/// A single argument handed to CMake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Flag {
    /// `-D<name>=<value>`; quoted values are wrapped in double quotes on the
    /// command line.
    Define {
        name: String,
        value: String,
        quoted: bool,
    },
    /// `-A<platform>`
    Arch(String),
    /// `-T <toolset>`
    Toolset(String),
    /// Passed through as-is.
    Raw(String),
}

impl Flag {
    pub fn define(name: impl Into<String>, value: impl Into<String>) -> Self {
        Flag::Define {
            name: name.into(),
            value: value.into(),
            quoted: false,
        }
    }

    pub fn quoted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Flag::Define {
            name: name.into(),
            value: value.into(),
            quoted: true,
        }
    }

    /// Process arguments for this flag. Quoting is a shell concern, so values
    /// are passed bare.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Flag::Define { name, value, .. } => vec![format!("-D{}={}", name, value)],
            Flag::Arch(arch) => vec![format!("-A{}", arch)],
            Flag::Toolset(toolset) => vec!["-T".to_string(), toolset.clone()],
            Flag::Raw(raw) => vec![raw.clone()],
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Define {
                name,
                value,
                quoted: true,
            } => write!(f, "-D{}=\"{}\"", name, value),
            Flag::Define { name, value, .. } => write!(f, "-D{}={}", name, value),
            Flag::Arch(arch) => write!(f, "-A{}", arch),
            Flag::Toolset(toolset) => write!(f, "-T {}", toolset),
            Flag::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Everything needed to run CMake for one preset.
///
/// Built once per resolution and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInvocation {
    preset: String,
    target_platform: TargetPlatform,
    executable: PathBuf,
    launcher_args: Vec<String>,
    generator: Option<Generator>,
    definitions: Vec<Flag>,
    is_multi_config: bool,
    output_directories: Vec<OutputDirectory>,
}

/// A build tree to (re)generate, with the configuration it is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDirectory {
    pub path: PathBuf,
    /// `None` for multi-config trees.
    pub config: Option<BuildConfiguration>,
}

impl GeneratorInvocation {
    /// Assemble an invocation. Output directories are laid out under
    /// `<root>/compiler/` from the preset name and platform.
    pub fn new(
        preset: impl Into<String>,
        target_platform: TargetPlatform,
        executable: PathBuf,
        launcher_args: Vec<String>,
        generator: Option<Generator>,
        definitions: Vec<Flag>,
        root: &Path,
    ) -> Self {
        let preset = preset.into();
        let is_multi_config = target_platform.is_multi_config();
        let output_directories = output_directories(root, &preset, is_multi_config);

        GeneratorInvocation {
            preset,
            target_platform,
            executable,
            launcher_args,
            generator,
            definitions,
            is_multi_config,
            output_directories,
        }
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn target_platform(&self) -> TargetPlatform {
        self.target_platform
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments that precede everything else, e.g. `cmake` under `emcmake`.
    pub fn launcher_args(&self) -> &[String] {
        &self.launcher_args
    }

    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    pub fn definitions(&self) -> &[Flag] {
        &self.definitions
    }

    /// Definitions as they appear on a command line.
    pub fn definition_strings(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.to_string()).collect()
    }

    pub fn is_multi_config(&self) -> bool {
        self.is_multi_config
    }

    pub fn output_directories(&self) -> &[OutputDirectory] {
        &self.output_directories
    }

    /// Process arguments after the launcher, for one output directory.
    pub fn args_for(&self, source_dir: &Path, output: &OutputDirectory) -> Vec<String> {
        let mut args = self.launcher_args.clone();
        args.push(source_dir.display().to_string());
        if let Some(ref generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator.name());
        }
        for flag in &self.definitions {
            args.extend(flag.to_args());
        }
        if let Some(config) = output.config {
            args.push(format!("-DCMAKE_BUILD_TYPE={}", config));
        }
        args
    }

    /// Shell-style rendering of the command for one output directory.
    pub fn command_line(&self, source_dir: &Path, output: &OutputDirectory) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(self.launcher_args.iter().cloned());
        parts.push(format!("\"{}\"", source_dir.display()));
        if let Some(ref generator) = self.generator {
            parts.push(format!("-G \"{}\"", generator.name()));
        }
        parts.extend(self.definition_strings());
        if let Some(config) = output.config {
            parts.push(format!("-DCMAKE_BUILD_TYPE={}", config));
        }
        parts.join(" ")
    }
}

fn output_directories(root: &Path, preset: &str, multi_config: bool) -> Vec<OutputDirectory> {
    let compiler_dir = root.join("compiler");
    if multi_config {
        vec![OutputDirectory {
            path: compiler_dir.join(preset),
            config: None,
        }]
    } else {
        BuildConfiguration::ALL
            .into_iter()
            .map(|config| OutputDirectory {
                path: compiler_dir.join(format!("{}-{}", preset, config)),
                config: Some(config),
            })
            .collect()
    }
}
