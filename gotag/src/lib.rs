//! Core library for the gotag struct tagging tool.
//!
//! Parses a Go file, finds the struct type around a byte offset, adds a tag
//! key to each exported field, and prints the file back with every
//! untouched region preserved.
//!
//! ```no_run
//! use gotag::tagger::{FilePosition, TagSpec};
//!
//! # fn main() -> Result<(), gotag::error::TagError> {
//! let mut position = FilePosition::from_spec("model.go:#120")?;
//! position.tag_struct(&TagSpec::new("json", "", ",omitempty")?)?;
//! println!("{}", position.render()?);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the error type shared by every stage.
pub mod error;

/// Module containing the Tree-sitter based Go syntax tree.
pub mod cst;

/// Module containing the locator, the field annotator and the tag grammar.
pub mod tagger;

/// Module turning a mutated tree back into source text.
pub mod printer;

/// Module containing the byte-range rewriter used by the printer.
pub mod fix;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants.
pub mod constants;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for colored status lines, diffs and JSON reports.
pub mod output;

/// Module defining the entry point logic shared by both binaries.
pub mod entry_point;
