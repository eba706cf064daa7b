//! Human and machine readable output for a tagging run.

use colored::Colorize;
use similar::TextDiff;
use std::io::Write;

use crate::tagger::{FieldOutcome, StructReport};

/// Print an error line.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_error(writer: &mut impl Write, message: &str) -> std::io::Result<()> {
    writeln!(writer, "{} {message}", "Error:".red().bold())
}

/// Print the one-line summary after a struct was tagged.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    report: &StructReport,
    written: bool,
) -> std::io::Result<()> {
    let changed = report.changed();
    let label = if changed == 0 {
        "Unchanged:".yellow().bold()
    } else {
        "Tagged:".green().bold()
    };
    let suffix = if written { ", written" } else { "" };
    writeln!(
        writer,
        "{label} {}:{} {} of {} fields got `{}`{suffix}",
        report.file,
        report.start_line,
        changed,
        report.fields.len(),
        report.tag
    )
}

/// Print one line per field with the decision taken for it.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_field_outcomes(writer: &mut impl Write, report: &StructReport) -> std::io::Result<()> {
    for field in &report.fields {
        let marker = match field.outcome {
            FieldOutcome::Added | FieldOutcome::Appended | FieldOutcome::Replaced => {
                "+".green()
            }
            _ => "·".dimmed(),
        };
        writeln!(
            writer,
            "  {marker} {}:{} {} {}",
            report.file,
            field.line,
            field.field,
            outcome_label(field.outcome).dimmed()
        )?;
    }
    Ok(())
}

fn outcome_label(outcome: FieldOutcome) -> &'static str {
    match outcome {
        FieldOutcome::Added => "(added)",
        FieldOutcome::Appended => "(appended)",
        FieldOutcome::Replaced => "(replaced blank tag)",
        FieldOutcome::AlreadyTagged => "(already tagged)",
        FieldOutcome::Unexported => "(unexported)",
        FieldOutcome::Embedded => "(embedded)",
        FieldOutcome::MultipleNames => "(several names)",
    }
}

/// Unified diff between the original and the rendered file.
///
/// Empty when nothing changed.
#[must_use]
pub fn unified_diff(path: &str, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

/// Write the report as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json(writer: &mut impl Write, report: &StructReport) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
