//! The tag command: tag one struct and emit the result.

use anyhow::Result;
use std::fs;
use std::io::Write;

use crate::error::TagError;
use crate::output;
use crate::tagger::{FilePosition, TagSpec, Target};

/// Options for one tagging run, after config and flags were merged.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TagRunOptions {
    /// File and offset selecting the struct.
    pub target: Target,
    /// Tag key and value shape.
    pub spec: TagSpec,
    /// Rewrite the file instead of printing it.
    pub write: bool,
    /// Print a unified diff.
    pub diff: bool,
    /// Print the JSON report.
    pub json: bool,
    /// List per-field decisions on stderr.
    pub verbose: bool,
}

/// Tag the struct at `options.target`.
///
/// Source text, diff, or JSON goes to `writer`; status lines go to stderr.
/// The file is only rewritten after the new source rendered successfully.
///
/// # Errors
///
/// Returns the underlying [`TagError`] for any failure to read, parse,
/// locate, render, or write back.
pub fn run_tag<W: Write>(options: &TagRunOptions, writer: &mut W) -> Result<i32> {
    let target = &options.target;
    let mut position = FilePosition::open(&target.path, target.offset)?;
    let report = position.tag_struct(&options.spec)?;
    let original = position.source().to_owned();
    let rendered = position.render()?;

    if options.write {
        if rendered != original {
            write_back(target, &rendered)?;
        }
        tracing::info!(
            file = %target.path.display(),
            changed = report.changed(),
            "wrote tagged file"
        );
    }

    if options.json {
        output::print_json(writer, &report)?;
    } else if options.diff {
        write!(writer, "{}", output::unified_diff(&report.file, &original, &rendered))?;
    } else if !options.write {
        write!(writer, "{rendered}")?;
    }
    writer.flush()?;

    let mut stderr = std::io::stderr();
    if options.verbose {
        output::print_field_outcomes(&mut stderr, &report)?;
    }
    if options.write {
        output::print_summary(&mut stderr, &report, true)?;
    }

    Ok(0)
}

fn write_back(target: &Target, text: &str) -> Result<(), TagError> {
    let access = |source| TagError::FileAccess {
        path: target.path.clone(),
        source,
    };
    let mut file = fs::File::create(&target.path).map_err(access)?;
    file.write_all(text.as_bytes()).map_err(access)?;
    file.flush().map_err(access)
}
