//! Interactive preset selection.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::sources::PresetEntry;

/// Print a numbered menu of `presets` to `output` and read the chosen
/// number from `input`.
///
/// ```text
/// Preset parameter required, available presets:
/// (0) linux <--- Linux clang PhysX general settings
/// (1) mac64 <--- macOS Xcode PhysX general settings
/// Enter preset number:
/// ```
pub fn select_preset<'a, R, W>(
    presets: &'a [PresetEntry],
    input: &mut R,
    output: &mut W,
) -> Result<&'a PresetEntry>
where
    R: BufRead,
    W: Write,
{
    if presets.is_empty() {
        bail!("no presets are available on this host");
    }

    writeln!(output, "Preset parameter required, available presets:")?;
    for (index, preset) in presets.iter().enumerate() {
        match preset.comment.as_deref() {
            Some(comment) => writeln!(output, "({}) {} <--- {}", index, preset.name, comment)?,
            None => writeln!(output, "({}) {}", index, preset.name)?,
        }
    }
    write!(output, "Enter preset number: ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read preset selection")?;
    if read == 0 {
        bail!("no preset selected");
    }

    let choice = line.trim();
    let index: usize = choice
        .parse()
        .with_context(|| format!("`{}` is not a preset number", choice))?;

    presets.get(index).with_context(|| {
        format!(
            "preset number {} is out of range (0..={})",
            index,
            presets.len() - 1
        )
    })
}
