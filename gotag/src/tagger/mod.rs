//! Tagging session for one Go file.
//!
//! A [`FilePosition`] owns the parsed file and the byte offset the user
//! pointed at. [`FilePosition::tag_struct`] mutates the tree in place and
//! [`FilePosition::render`] turns it back into source text.

mod annotate;
mod locate;
mod struct_tag;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

pub use annotate::{annotate, is_exported, ExportPredicate, FieldOutcome, FieldReport, TagSpec};
pub use locate::{find_struct, find_struct_mut, struct_path};
pub use struct_tag::{StructTag, TagLiteral};

use crate::constants::POSITION_SEPARATOR;
use crate::cst::{CstParser, CstTree, PositionIndex};
use crate::error::{TagError, TagResult};
use crate::printer;

/// A parsed `<file>:#<offset>` position descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path of the Go file.
    pub path: PathBuf,
    /// Byte offset into the file.
    pub offset: usize,
}

impl FromStr for Target {
    type Err = TagError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = spec.split(POSITION_SEPARATOR).collect();
        let [path, offset] = parts.as_slice() else {
            return Err(TagError::InvalidPosition {
                spec: spec.to_owned(),
            });
        };

        let offset = Some(*offset)
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| TagError::NonNumericOffset {
                spec: spec.to_owned(),
            })?;

        Ok(Self {
            path: PathBuf::from(path),
            offset,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{POSITION_SEPARATOR}{}", self.path.display(), self.offset)
    }
}

/// Result of tagging one struct.
#[derive(Debug, Clone, Serialize)]
pub struct StructReport {
    /// File the struct lives in.
    pub file: String,
    /// Offset that selected the struct.
    pub offset: usize,
    /// Tag key that was added.
    pub tag: String,
    /// 1-based line of the `struct` keyword.
    pub start_line: usize,
    /// 1-based line of the closing brace.
    pub end_line: usize,
    /// One entry per field declaration, in source order.
    pub fields: Vec<FieldReport>,
}

impl StructReport {
    /// Number of fields whose tag changed.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.fields.iter().filter(|f| f.outcome.is_change()).count()
    }
}

/// A Go file parsed into a tree, plus the offset that selects a struct in it.
#[derive(Debug)]
pub struct FilePosition {
    name: String,
    offset: usize,
    tree: CstTree,
}

impl FilePosition {
    /// Resolve a `<file>:#<offset>` descriptor, read the file and parse it.
    ///
    /// # Errors
    /// Returns a position error for a malformed descriptor, and otherwise
    /// whatever [`FilePosition::open`] returns.
    pub fn from_spec(spec: &str) -> TagResult<Self> {
        let target: Target = spec.parse()?;
        Self::open(&target.path, target.offset)
    }

    /// Read and parse `path`.
    ///
    /// # Errors
    /// Returns [`TagError::FileNotFound`] if the file does not exist,
    /// [`TagError::FileAccess`] if it cannot be read, and
    /// [`TagError::Parse`] if it is not valid Go.
    pub fn open(path: impl AsRef<Path>, offset: usize) -> TagResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TagError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let source = std::fs::read_to_string(path).map_err(|source| TagError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&path.display().to_string(), offset, &source)
    }

    /// Parse `source` as if it were the contents of `name`.
    ///
    /// # Errors
    /// Returns [`TagError::Parse`] if the source is not valid Go.
    pub fn from_source(name: &str, offset: usize, source: &str) -> TagResult<Self> {
        let tree = CstParser::new()?.parse(name, source)?;
        Ok(Self {
            name: name.to_owned(),
            offset,
            tree,
        })
    }

    /// File name as given.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selecting byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.tree.source
    }

    /// Line index of the original source.
    #[must_use]
    pub fn index(&self) -> &PositionIndex {
        &self.tree.index
    }

    /// Add `spec` to every exported, singly named field of the innermost
    /// struct around the offset.
    ///
    /// # Errors
    /// Returns [`TagError::NotFound`] when no struct contains the offset.
    pub fn tag_struct(&mut self, spec: &TagSpec) -> TagResult<StructReport> {
        self.tag_struct_with(spec, is_exported)
    }

    /// Like [`FilePosition::tag_struct`] with a custom export rule.
    ///
    /// # Errors
    /// Returns [`TagError::NotFound`] when no struct contains the offset.
    pub fn tag_struct_with(
        &mut self,
        spec: &TagSpec,
        exported: ExportPredicate,
    ) -> TagResult<StructReport> {
        let tree = &mut self.tree;
        let record = find_struct_mut(&mut tree.root, self.offset)?;
        let (start_line, end_line) = (
            tree.index.line(record.start_byte),
            tree.index.line(record.end_byte),
        );
        tracing::debug!(
            file = %self.name,
            offset = self.offset,
            start_line,
            end_line,
            "located struct"
        );

        let fields = annotate(record, &tree.source, &tree.index, spec, exported);

        Ok(StructReport {
            file: self.name.clone(),
            offset: self.offset,
            tag: spec.name().to_owned(),
            start_line,
            end_line,
            fields,
        })
    }

    /// Render the file with all changes applied.
    ///
    /// # Errors
    /// Returns [`TagError::Render`] if the result is not valid Go.
    pub fn render(self) -> TagResult<String> {
        printer::render(&self.tree, &self.name)
    }
}
