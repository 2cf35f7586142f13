//! Target platforms, compiler tags, and host eligibility.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Platform a preset generates build files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPlatform {
    Win32,
    Win64,
    Uwp32,
    Uwp64,
    UwpArm32,
    UwpArm64,
    Ps4,
    XboxOne,
    Switch32,
    Switch64,
    Android,
    Linux,
    LinuxAarch64,
    Mac64,
    Ios64,
    Emscripten,
}

impl TargetPlatform {
    /// All known platforms, in declaration order.
    pub const ALL: [TargetPlatform; 16] = [
        TargetPlatform::Win32,
        TargetPlatform::Win64,
        TargetPlatform::Uwp32,
        TargetPlatform::Uwp64,
        TargetPlatform::UwpArm32,
        TargetPlatform::UwpArm64,
        TargetPlatform::Ps4,
        TargetPlatform::XboxOne,
        TargetPlatform::Switch32,
        TargetPlatform::Switch64,
        TargetPlatform::Android,
        TargetPlatform::Linux,
        TargetPlatform::LinuxAarch64,
        TargetPlatform::Mac64,
        TargetPlatform::Ios64,
        TargetPlatform::Emscripten,
    ];

    /// The identifier used in preset files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Win32 => "win32",
            TargetPlatform::Win64 => "win64",
            TargetPlatform::Uwp32 => "uwp32",
            TargetPlatform::Uwp64 => "uwp64",
            TargetPlatform::UwpArm32 => "uwparm32",
            TargetPlatform::UwpArm64 => "uwparm64",
            TargetPlatform::Ps4 => "ps4",
            TargetPlatform::XboxOne => "xboxone",
            TargetPlatform::Switch32 => "switch32",
            TargetPlatform::Switch64 => "switch64",
            TargetPlatform::Android => "android",
            TargetPlatform::Linux => "linux",
            TargetPlatform::LinuxAarch64 => "linuxAarch64",
            TargetPlatform::Mac64 => "mac64",
            TargetPlatform::Ios64 => "ios64",
            TargetPlatform::Emscripten => "emscripten",
        }
    }

    /// Whether the generator for this platform handles every build
    /// configuration from a single build tree.
    ///
    /// Makefile-style targets need one tree per configuration.
    pub fn is_multi_config(&self) -> bool {
        !matches!(
            self,
            TargetPlatform::Linux
                | TargetPlatform::LinuxAarch64
                | TargetPlatform::Android
                | TargetPlatform::Emscripten
        )
    }
}

impl Serialize for TargetPlatform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Error parsing a target platform identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target platform `{0}`")]
pub struct UnknownPlatform(pub String);

/// Compiler toolset named by a preset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Compiler {
    Vc12,
    Vc14,
    Vc15,
    Vc16,
    Xcode,
    Clang,
    ClangCrossCompile,
    Gcc,
    /// A tag with no dedicated policy. Selects no generator.
    Other(String),
}

impl Compiler {
    /// The identifier used in preset files.
    pub fn as_str(&self) -> &str {
        match self {
            Compiler::Vc12 => "vc12",
            Compiler::Vc14 => "vc14",
            Compiler::Vc15 => "vc15",
            Compiler::Vc16 => "vc16",
            Compiler::Xcode => "xcode",
            Compiler::Clang => "clang",
            Compiler::ClangCrossCompile => "clang-crosscompile",
            Compiler::Gcc => "gcc",
            Compiler::Other(tag) => tag,
        }
    }
}

impl From<&str> for Compiler {
    fn from(s: &str) -> Self {
        match s {
            "vc12" => Compiler::Vc12,
            "vc14" => Compiler::Vc14,
            "vc15" => Compiler::Vc15,
            "vc16" => Compiler::Vc16,
            "xcode" => Compiler::Xcode,
            "clang" => Compiler::Clang,
            "clang-crosscompile" => Compiler::ClangCrossCompile,
            "gcc" => Compiler::Gcc,
            other => Compiler::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Compiler {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Operating system the generator runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Other,
}

impl HostPlatform {
    /// Detect the host at runtime.
    pub fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Other
        }
    }

    /// Top-level script, relative to the project root, that drives a full
    /// generation run on this host.
    pub fn generate_script(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "generate_projects.bat",
            HostPlatform::Other => "generate_projects.sh",
        }
    }
}

/// Preset name fragments that mark a preset as Windows-hosted.
pub const WINDOWS_HOSTED_TOKENS: &[&str] = &[
    "win",
    "uwp",
    "ps4",
    "switch",
    "xboxone",
    "android",
    "crosscompile",
    "emscripten",
];

/// Whether `preset_name` can be generated on `host`.
///
/// Windows hosts take presets whose name contains any Windows-hosted
/// token; every other host takes the presets that contain none.
pub fn is_preset_eligible(preset_name: &str, host: HostPlatform) -> bool {
    let windows_hosted = WINDOWS_HOSTED_TOKENS
        .iter()
        .any(|token| preset_name.contains(token));

    match host {
        HostPlatform::Windows => windows_hosted,
        HostPlatform::Other => !windows_hosted,
    }
}
