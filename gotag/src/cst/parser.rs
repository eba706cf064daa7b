//! Tree-sitter based CST parser for Go source code.
//!
//! Produces an owned tree with exact byte ranges so the tagger can mutate it
//! and the printer can splice the result back into the original text.

use tree_sitter::{Node, Parser};

use super::position::PositionIndex;
use crate::error::{TagError, TagResult};

/// A CST node with exact source location
#[derive(Debug, Clone)]
pub struct CstNode {
    /// Node kind (e.g., "struct_type", "field_declaration")
    pub kind: String,
    /// Grammar field this node fills in its parent (e.g., "name", "type", "tag")
    pub field: Option<&'static str>,
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Whether this is a named node (vs anonymous like punctuation)
    pub is_named: bool,
    /// Whether the parser inserted this node to recover from an error
    pub is_missing: bool,
    /// Replacement text set by a mutation; `None` means the source slice is current
    pub replacement: Option<String>,
    /// Child nodes
    pub children: Vec<CstNode>,
}

impl CstNode {
    /// Create a `CstNode` from a tree-sitter `Node`
    fn from_ts_node(node: Node<'_>, field: Option<&'static str>) -> Self {
        let mut children = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                children.push(Self::from_ts_node(cursor.node(), cursor.field_name()));
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        Self {
            kind: node.kind().to_owned(),
            field,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            is_named: node.is_named(),
            is_missing: node.is_missing(),
            replacement: None,
            children,
        }
    }

    /// Create a node that does not exist in the source, anchored at `at`.
    ///
    /// Synthesized nodes are zero-width; the printer emits their replacement
    /// text at the anchor.
    #[must_use]
    pub fn synthesized(kind: &str, field: &'static str, at: usize, text: String) -> Self {
        Self {
            kind: kind.to_owned(),
            field: Some(field),
            start_byte: at,
            end_byte: at,
            is_named: true,
            is_missing: false,
            replacement: Some(text),
            children: Vec::new(),
        }
    }

    /// Whether this node was created by a mutation rather than parsed.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.start_byte == self.end_byte && self.replacement.is_some()
    }

    /// Check if this node's range contains the given byte offset.
    ///
    /// Both ends are inclusive, so the offset just past the last byte matches.
    #[must_use]
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start_byte <= offset && offset <= self.end_byte
    }

    /// First child filling the given grammar field
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<&CstNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// Mutable variant of [`CstNode::child_by_field`]
    pub fn child_by_field_mut(&mut self, field: &str) -> Option<&mut CstNode> {
        self.children.iter_mut().find(|c| c.field == Some(field))
    }

    /// All children filling the given grammar field, in source order
    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a CstNode> {
        self.children.iter().filter(move |c| c.field == Some(field))
    }

    /// First child of the given kind
    #[must_use]
    pub fn child_by_kind(&self, kind: &str) -> Option<&CstNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Whether this node or any descendant carries a mutation
    #[must_use]
    pub fn has_replacement(&self) -> bool {
        self.replacement.is_some() || self.children.iter().any(CstNode::has_replacement)
    }

    /// Current text of this node: the replacement if one was set, else the source slice.
    ///
    /// Only the node's own replacement is honoured; use the printer to render
    /// subtrees with nested mutations.
    #[must_use]
    pub fn text<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.replacement {
            Some(text) => text,
            None => &source[self.start_byte..self.end_byte],
        }
    }

    /// Find all nodes of a specific kind
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> Vec<&CstNode> {
        let mut result = Vec::new();
        self.find_by_kind_recursive(kind, &mut result);
        result
    }

    fn find_by_kind_recursive<'a>(&'a self, kind: &str, result: &mut Vec<&'a CstNode>) {
        if self.kind == kind {
            result.push(self);
        }
        for child in &self.children {
            child.find_by_kind_recursive(kind, result);
        }
    }

    /// First node in pre-order that is a parse error or a recovery insertion
    fn first_error(&self) -> Option<&CstNode> {
        if self.kind == "ERROR" || self.is_missing {
            return Some(self);
        }
        self.children.iter().find_map(CstNode::first_error)
    }
}

/// A parsed CST tree
#[derive(Debug, Clone)]
pub struct CstTree {
    /// Root node of the CST (`source_file`)
    pub root: CstNode,
    /// Original source code
    pub source: String,
    /// Line index built from `source`
    pub index: PositionIndex,
}

impl CstTree {
    /// Extract a slice of source code by byte range
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }
}

/// Tree-sitter based CST parser
pub struct CstParser {
    parser: Parser,
}

impl CstParser {
    /// Create a new CST parser for Go
    ///
    /// # Errors
    /// Returns error if the grammar cannot be loaded
    pub fn new() -> TagResult<Self> {
        let mut parser = Parser::new();

        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| TagError::ParserInit(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Parse Go source into a CST.
    ///
    /// `file` is only used to label diagnostics.
    ///
    /// # Errors
    /// Returns [`TagError::Parse`] for the first syntax error in the file
    pub fn parse(&mut self, file: &str, source: &str) -> TagResult<CstTree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| TagError::ParserInit("parser returned no tree".to_owned()))?;

        let root = CstNode::from_ts_node(tree.root_node(), None);
        let index = PositionIndex::new(source);

        check_syntax(file, source, &root, &index)?;
        tracing::debug!(file, nodes = count_nodes(&root), "parsed Go source");

        Ok(CstTree {
            root,
            source: source.to_owned(),
            index,
        })
    }
}

/// Reject trees containing error nodes and files without a package clause.
fn check_syntax(file: &str, source: &str, root: &CstNode, index: &PositionIndex) -> TagResult<()> {
    let parse_error = |offset: usize, message: String| {
        let (line, column) = index.line_col(offset);
        TagError::Parse {
            file: file.to_owned(),
            line,
            column,
            message,
        }
    };

    if let Some(node) = root.first_error() {
        let message = if node.is_missing {
            format!("expected '{}'", node.kind)
        } else {
            format!("unexpected '{}'", snippet(&source[node.start_byte..node.end_byte]))
        };
        return Err(parse_error(node.start_byte, message));
    }

    let first = root.children.iter().find(|c| c.kind != "comment");
    match first {
        Some(node) if node.kind == "package_clause" => Ok(()),
        Some(node) => Err(parse_error(
            node.start_byte,
            format!(
                "expected 'package', found '{}'",
                snippet(&source[node.start_byte..node.end_byte])
            ),
        )),
        None => Err(parse_error(
            source.len(),
            "expected 'package', found 'EOF'".to_owned(),
        )),
    }
}

/// First token-ish word of a node's text, for error messages
fn snippet(text: &str) -> &str {
    let text = text.trim_start();
    let end = text
        .find(|c: char| c.is_whitespace())
        .unwrap_or(text.len());
    if end == 0 {
        "EOF"
    } else {
        &text[..end]
    }
}

fn count_nodes(node: &CstNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}
