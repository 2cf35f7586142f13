//! Preset resolution and generation error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::invocation::BuildConfiguration;
use crate::util::diagnostic::{suggestions, Diagnostic, PresetSyntaxError};

/// Error while resolving a preset or running the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("preset `{name}` not found")]
    PresetNotFound { name: String, tried: Vec<PathBuf> },

    #[error(transparent)]
    InvalidPreset(Box<PresetSyntaxError>),

    #[error("target platform `{platform}` is not supported (preset `{preset}`)")]
    UnsupportedPlatform { preset: String, platform: String },

    #[error("environment variable `{var}` is not set")]
    MissingEnvironment {
        var: String,
        hint: Option<String>,
    },

    #[error("generation failed for {}", config_label(.config))]
    GenerationFailed {
        config: Option<BuildConfiguration>,
        code: Option<i32>,
    },
}

fn config_label(config: &Option<BuildConfiguration>) -> String {
    match config {
        Some(config) => format!("configuration `{}`", config),
        None => "all configurations".to_string(),
    }
}

impl GenerateError {
    /// Shorthand for a missing variable without a hint.
    pub fn missing_env(var: impl Into<String>) -> Self {
        GenerateError::MissingEnvironment {
            var: var.into(),
            hint: None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateError::PresetNotFound { name, tried } => {
                let mut diag = Diagnostic::error(format!("preset `{}` not found", name));
                for path in tried {
                    diag = diag.with_context(format!("looked in {}", path.display()));
                }
                diag.with_suggestion(suggestions::LIST_PRESETS)
            }

            GenerateError::InvalidPreset(err) => {
                let mut diag = Diagnostic::error(err.message.clone())
                    .with_location(err.path.clone());
                if let Some(ref help) = err.help {
                    diag = diag.with_suggestion(help.clone());
                }
                diag
            }

            GenerateError::UnsupportedPlatform { preset, platform } => {
                Diagnostic::error(format!(
                    "preset `{}` targets unsupported platform `{}`",
                    preset, platform
                ))
                .with_suggestion(suggestions::SUPPORTED_PLATFORMS)
            }

            GenerateError::MissingEnvironment { var, hint } => {
                let mut diag =
                    Diagnostic::error(format!("environment variable `{}` is not set", var));
                if let Some(hint) = hint {
                    diag = diag.with_context(hint.clone());
                }
                diag.with_suggestion(suggestions::BOOTSTRAP_ENV)
            }

            GenerateError::GenerationFailed { config, code } => {
                let mut diag = Diagnostic::error(self.to_string());
                match code {
                    Some(code) => diag = diag.with_context(format!("cmake exited with code {}", code)),
                    None => diag = diag.with_context("cmake was terminated by a signal"),
                }
                if config.is_some() {
                    diag = diag.with_context("remaining configurations were skipped");
                }
                diag.with_suggestion(suggestions::GENERATION_FAILED)
            }
        }
    }
}

impl From<PresetSyntaxError> for GenerateError {
    fn from(err: PresetSyntaxError) -> Self {
        GenerateError::InvalidPreset(Box::new(err))
    }
}
