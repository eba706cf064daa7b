//! CST (Concrete Syntax Tree) module for Go sources.
//!
//! This module provides Tree-sitter based CST parsing for:
//! - Precise byte-range extraction of struct types, fields and tags
//! - An owned tree that the tagger mutates in place
//! - Line/column resolution for diagnostics and layout decisions
//!
//! # Design Principles
//!
//! - **Delegate the grammar**: tree-sitter-go does the parsing, nothing here knows Go syntax rules
//! - **Byte-range anchored**: nodes keep raw byte offsets into the original text
//! - **Mutations are overlays**: a changed node keeps its span and carries replacement text

mod parser;
mod position;

pub use parser::{CstNode, CstParser, CstTree};
pub use position::PositionIndex;
