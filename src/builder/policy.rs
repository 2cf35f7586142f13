//! Per-platform generator policy.
//!
//! Maps a `(target platform, compiler)` pair to the CMake generator and the
//! platform definitions that precede everything else on the command line.

use crate::core::errors::GenerateError;
use crate::core::invocation::{Flag, Generator};
use crate::core::platform::{Compiler, TargetPlatform};
use crate::util::env::{
    Environment, EMSCRIPTEN, PM_ANDROID_NDK_PATH, PM_CLANG_PATH, PM_CMAKE_MODULES_PATH, VS150_PATH,
};

/// Generator selection plus platform definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFlags {
    pub generator: Option<Generator>,
    pub flags: Vec<Flag>,
}

/// Generator for a compiler/platform pair. IDE generators follow the
/// compiler; Makefile generators follow the platform.
pub fn generator_for(target: TargetPlatform, compiler: &Compiler) -> Option<Generator> {
    let vs = |version, year| Some(Generator::VisualStudio { version, year });

    match (compiler, target) {
        (Compiler::Vc12, _) => vs(12, 2013),
        (Compiler::Vc14, _) => vs(14, 2015),
        (Compiler::Vc15, _) => vs(15, 2017),
        (Compiler::Vc16, _) => vs(16, 2019),
        (Compiler::Xcode, _) => Some(Generator::Xcode),
        (_, TargetPlatform::Android) => Some(Generator::MinGwMakefiles),
        (_, TargetPlatform::Linux | TargetPlatform::LinuxAarch64) => {
            Some(Generator::UnixMakefiles)
        }
        _ => None,
    }
}

/// Resolve generator and platform definitions.
///
/// Fails with [`GenerateError::MissingEnvironment`] when the platform needs a
/// toolchain path the environment does not provide.
pub fn platform_flags(
    target: TargetPlatform,
    compiler: &Compiler,
    env: &Environment,
) -> Result<PlatformFlags, GenerateError> {
    let modules = || env.require(PM_CMAKE_MODULES_PATH);
    let toolchain = |rel: &str| -> Result<Flag, GenerateError> {
        Ok(Flag::define(
            "CMAKE_TOOLCHAIN_FILE",
            format!("{}/{}", modules()?, rel),
        ))
    };
    let quoted_toolchain = |rel: &str| -> Result<Flag, GenerateError> {
        Ok(Flag::quoted(
            "CMAKE_TOOLCHAIN_FILE",
            format!("{}/{}", modules()?, rel),
        ))
    };
    let build_platform = |name: &str| Flag::define("TARGET_BUILD_PLATFORM", name);
    let arch = |name: &str| Flag::define("PX_OUTPUT_ARCH", name);

    let flags = match target {
        TargetPlatform::Win32 => vec![Flag::Arch("Win32".into()), build_platform("windows"), arch("x86")],
        TargetPlatform::Win64 => vec![Flag::Arch("x64".into()), build_platform("windows"), arch("x86")],

        TargetPlatform::Uwp32
        | TargetPlatform::Uwp64
        | TargetPlatform::UwpArm32
        | TargetPlatform::UwpArm64 => {
            let (generator_arch, output_arch) = match target {
                TargetPlatform::Uwp32 => ("Win32", "x86"),
                TargetPlatform::Uwp64 => ("x64", "x86"),
                TargetPlatform::UwpArm32 => ("ARM", "arm"),
                _ => ("ARM64", "arm"),
            };
            vec![
                Flag::Arch(generator_arch.into()),
                build_platform("uwp"),
                arch(output_arch),
                Flag::define("CMAKE_SYSTEM_NAME", "WindowsStore"),
                Flag::define("CMAKE_SYSTEM_VERSION", "10.0"),
            ]
        }

        TargetPlatform::Ps4 => vec![
            build_platform("ps4"),
            toolchain("ps4/PS4Toolchain.txt")?,
            Flag::define("CMAKE_GENERATOR_PLATFORM", "ORBIS"),
            Flag::define("SUPPRESS_SUFFIX", "ON"),
        ],

        TargetPlatform::XboxOne => {
            let mut flags = vec![build_platform("xboxone")];
            match compiler {
                Compiler::Vc14 => flags.push(toolchain("xboxone/XboxOneToolchain.txt")?),
                Compiler::Vc15 => {
                    flags.push(toolchain("xboxone/XboxOneToolchainVC15.txt")?);
                    flags.push(Flag::Toolset("v141".into()));
                    flags.push(Flag::define("CMAKE_VS150PATH", env.require(VS150_PATH)?));
                }
                _ => {}
            }
            flags.push(Flag::define("CMAKE_GENERATOR_PLATFORM", "Durango"));
            flags.push(Flag::define("SUPPRESS_SUFFIX", "ON"));
            flags
        }

        TargetPlatform::Switch32 => vec![
            build_platform("switch"),
            toolchain("switch/NX32Toolchain.txt")?,
            Flag::define("CMAKE_GENERATOR_PLATFORM", "NX32"),
        ],
        TargetPlatform::Switch64 => vec![
            build_platform("switch"),
            toolchain("switch/NX64Toolchain.txt")?,
            Flag::define("CMAKE_GENERATOR_PLATFORM", "NX64"),
        ],

        TargetPlatform::Android => {
            let toolchain_file = toolchain("android/android.toolchain.cmake")?;
            let ndk = env
                .get(PM_ANDROID_NDK_PATH)
                .ok_or_else(|| GenerateError::MissingEnvironment {
                    var: PM_ANDROID_NDK_PATH.to_string(),
                    hint: Some(format!(
                        "Please provide path to android NDK in variable {}",
                        PM_ANDROID_NDK_PATH
                    )),
                })?;
            vec![
                build_platform("android"),
                toolchain_file,
                Flag::quoted("ANDROID_STL", "gnustl_static"),
                Flag::quoted("CM_ANDROID_FP", "softfp"),
                Flag::define("ANDROID_NDK", ndk),
                Flag::quoted(
                    "CMAKE_MAKE_PROGRAM",
                    format!("{}\\prebuilt\\windows\\bin\\make.exe", ndk),
                ),
            ]
        }

        TargetPlatform::Linux => {
            let mut flags = vec![build_platform("linux"), arch("x86")];
            match compiler {
                Compiler::ClangCrossCompile => flags.push(toolchain(
                    "linux/LinuxCrossToolchain.x86_64-unknown-linux-gnu.cmake",
                )?),
                Compiler::Clang => match env.get(PM_CLANG_PATH) {
                    Some(clang) => {
                        flags.push(Flag::define("CMAKE_C_COMPILER", format!("{}/bin/clang", clang)));
                        flags.push(Flag::define("CMAKE_CXX_COMPILER", format!("{}/bin/clang++", clang)));
                    }
                    None => {
                        flags.push(Flag::define("CMAKE_C_COMPILER", "clang"));
                        flags.push(Flag::define("CMAKE_CXX_COMPILER", "clang++"));
                    }
                },
                _ => {}
            }
            flags
        }

        TargetPlatform::LinuxAarch64 => {
            let mut flags = vec![build_platform("linux"), arch("arm")];
            match compiler {
                Compiler::ClangCrossCompile => flags.push(toolchain(
                    "linux/LinuxCrossToolchain.aarch64-unknown-linux-gnueabihf.cmake",
                )?),
                Compiler::Gcc => flags.push(quoted_toolchain("linux/LinuxAarch64.cmake")?),
                _ => {}
            }
            flags
        }

        TargetPlatform::Mac64 => vec![build_platform("mac"), arch("x86")],

        TargetPlatform::Ios64 => vec![
            build_platform("ios"),
            quoted_toolchain("ios/ios.toolchain.cmake")?,
            arch("arm"),
        ],

        TargetPlatform::Emscripten => vec![
            build_platform("emscripten"),
            Flag::quoted(
                "CMAKE_TOOLCHAIN_FILE",
                format!(
                    "{}/cmake/Modules/Platform/Emscripten.cmake",
                    env.require(EMSCRIPTEN)?
                ),
            ),
        ],
    };

    Ok(PlatformFlags {
        generator: generator_for(target, compiler),
        flags,
    })
}
