//! User-facing diagnostic messages.
//!
//! Every failure path reports root cause, the offending location, and what to
//! try next, instead of a bare error string.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a preset name is unknown.
    pub const LIST_PRESETS: &str = "Run `presetgen list` to see the presets available on this host";

    /// Suggestion when a preset targets an unknown platform.
    pub const SUPPORTED_PLATFORMS: &str = "Use one of: win32, win64, uwp32, uwp64, uwparm32, uwparm64, ps4, xboxone, switch32, switch64, android, linux, linuxAarch64, mac64, ios64, emscripten";

    /// Suggestion when a required environment variable is missing.
    pub const BOOTSTRAP_ENV: &str =
        "Run the generate_projects script so the dependency manager can export its paths";

    /// Suggestion when the generator exits with an error.
    pub const GENERATION_FAILED: &str =
        "Re-run with `presetgen --verbose generate <preset>` to see the full cmake command";

    /// Suggestion when a preset is filtered out on this host.
    pub const WRONG_HOST: &str =
        "Presets naming win, uwp, ps4, switch, xboxone, android, crosscompile or emscripten are generated from Windows hosts only";
}

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Bold red or bold yellow.
    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A report for the terminal: one headline, the file it concerns, notes
/// that explain it, and numbered things to try.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<PathBuf>,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: String) -> Self {
        Diagnostic {
            severity,
            message,
            location: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message.into())
    }

    /// Append a note line.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Append something the user can try.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Point at the file the diagnostic is about.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for a terminal, with ANSI colors when `color` is set.
    ///
    /// ```text
    /// error: preset `vc15win64` not found
    ///   = looked in buildtools/presets/vc15win64.xml
    ///
    /// help: consider:
    ///   1. Run `presetgen list` to see the presets available on this host
    /// ```
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut lines = vec![format!(
            "{}: {}",
            paint(self.severity.ansi(), self.severity.label()),
            self.message
        )];
        lines.extend(self.location.iter().map(|p| format!("  --> {}", p.display())));
        lines.extend(self.context.iter().map(|note| format!("  = {}", note)));

        if !self.suggestions.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}: consider:", paint("1;32", "help")));
            lines.extend(
                self.suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("  {}. {}", i + 1, s)),
            );
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Malformed preset markup, with the offending span when known.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(code(presetgen::preset::invalid))]
pub struct PresetSyntaxError {
    pub message: String,
    pub path: PathBuf,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
    #[help]
    pub help: Option<String>,
}

impl PresetSyntaxError {
    /// Create an error against the preset file at `path` with contents `src`.
    pub fn new(message: impl Into<String>, path: impl Into<PathBuf>, src: &str) -> Self {
        let path = path.into();
        PresetSyntaxError {
            message: message.into(),
            src: NamedSource::new(path.display().to_string(), src.to_string()),
            path,
            span: None,
            help: None,
        }
    }

    /// Point at a byte range in the source.
    pub fn with_span(mut self, span: std::ops::Range<usize>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// Attach a help line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with source snippet and label for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let handler =
            miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
        if handler
            .render_report(&mut out, self)
            .is_err()
        {
            return self.to_string();
        }
        out
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("preset `vc15win64` not found")
            .with_context("looked in buildtools/presets/vc15win64.xml")
            .with_suggestion("Run `presetgen list`");

        let output = diag.format(false);
        assert!(output.contains("error: preset `vc15win64` not found"));
        assert!(output.contains("= looked in buildtools/presets/vc15win64.xml"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Run `presetgen list`"));
    }

    #[test]
    fn test_warning_with_location_and_color() {
        let diag = Diagnostic::warning("preset `ps4` is not supported on this build platform")
            .with_location("buildtools/presets/ps4.xml");

        let plain = diag.format(false);
        assert_eq!(
            plain,
            "warning: preset `ps4` is not supported on this build platform\n  --> buildtools/presets/ps4.xml\n"
        );
        assert!(!plain.contains("help"));

        let colored = diag.format(true);
        assert!(colored.starts_with("\x1b[1;33mwarning\x1b[0m: "));
    }

    #[test]
    fn test_syntax_error_renders_source_label() {
        let src = "<preset name=\"x\">\n  <platform/>\n</preset>\n";
        let err = PresetSyntaxError::new("platform is missing `targetPlatform`", "x.xml", src)
            .with_span(20..31);

        let rendered = err.render();
        assert!(rendered.contains("platform is missing `targetPlatform`"));
        assert!(rendered.contains("x.xml"));
    }
}
