//! Output formatting for comparison results (human/JSON).

use std::fmt::Write as _;

use serde::Serialize;

use super::types::{format_time, ComparisonOutcome, FailureReason, Mismatch, OutputFormat};

/// Format a comparison outcome for display (human-readable).
pub fn format_outcome(outcome: &ComparisonOutcome) -> String {
    let mut output = String::new();

    writeln!(output, "Compare: {}", outcome.candidate.display()).unwrap();
    writeln!(output, "   with: {}", outcome.reference.display()).unwrap();
    writeln!(output).unwrap();

    match &outcome.mismatch {
        None => {
            writeln!(
                output,
                "Result: PASSED ({} files identical)",
                outcome.files_checked
            )
            .unwrap();
        }
        Some(mismatch) => {
            write_mismatch(&mut output, mismatch);
            writeln!(output).unwrap();
            writeln!(
                output,
                "Result: FAILED [{}] after {} matching files",
                mismatch.reason(),
                outcome.files_checked
            )
            .unwrap();
        }
    }

    output
}

fn write_mismatch(output: &mut String, mismatch: &Mismatch) {
    match mismatch {
        Mismatch::MissingFiles { missing, excess } => {
            writeln!(output, "Missing from candidate:").unwrap();
            for file in missing {
                writeln!(output, "  - {}", file).unwrap();
            }
            if !excess.is_empty() {
                writeln!(output, "Not in reference:").unwrap();
                for file in excess {
                    writeln!(output, "  + {}", file).unwrap();
                }
            }
        }
        Mismatch::ExcessFiles { excess } => {
            writeln!(output, "Not in reference:").unwrap();
            for file in excess {
                writeln!(output, "  + {}", file).unwrap();
            }
        }
        Mismatch::StaleCandidate {
            file,
            candidate_modified,
            reference_modified,
        } => {
            writeln!(output, "Candidate is not newer than reference: {}", file).unwrap();
            writeln!(output, "  candidate modified: {}", format_time(*candidate_modified)).unwrap();
            writeln!(output, "  reference modified: {}", format_time(*reference_modified)).unwrap();
        }
        Mismatch::UnreadableFile { path, side, error } => {
            writeln!(output, "Cannot read {} file: {}", side, path.display()).unwrap();
            writeln!(output, "  {}", error).unwrap();
        }
        Mismatch::EmptyFile { path, side } => {
            writeln!(output, "Empty {} file: {}", side, path.display()).unwrap();
        }
        Mismatch::LineCountMismatch {
            file,
            candidate_lines,
            reference_lines,
        } => {
            writeln!(output, "Line count differs: {}", file).unwrap();
            writeln!(output, "  candidate: {} lines", candidate_lines).unwrap();
            writeln!(output, "  reference: {} lines", reference_lines).unwrap();
        }
        Mismatch::LineContentMismatch {
            file,
            line,
            candidate,
            reference,
        } => {
            writeln!(output, "Line {} differs: {}", line, file).unwrap();
            writeln!(output, "  candidate: {}", candidate).unwrap();
            writeln!(output, "  reference: {}", reference).unwrap();
        }
    }
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    verdict: &'static str,
    reason: Option<FailureReason>,
    #[serde(flatten)]
    outcome: &'a ComparisonOutcome,
}

/// Format a comparison outcome as JSON.
pub fn format_outcome_json(outcome: &ComparisonOutcome) -> String {
    let report = JsonOutcome {
        verdict: if outcome.passed() { "pass" } else { "fail" },
        reason: outcome.reason(),
        outcome,
    };
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize outcome: {}"}}"#, e))
}

/// Format the outcome according to the specified output format.
pub fn format_outcome_for_output(outcome: &ComparisonOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_outcome(outcome),
        OutputFormat::Json => format_outcome_json(outcome),
    }
}
