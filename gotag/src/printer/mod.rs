//! Turns a mutated tree back into Go source.
//!
//! Regions without mutations are copied byte for byte. A struct type whose
//! field tags changed is laid out again the way `gofmt` lays out struct
//! types: one field per line, names, types, tags and trailing comments in
//! aligned columns, blank lines collapsed to one. The result is re-parsed
//! before it is returned.

mod align;

use crate::cst::{CstNode, CstParser, CstTree};
use crate::error::{TagError, TagResult};
use crate::fix::{ByteRangeRewriter, Edit, RewriteError};

/// Render the whole file with all mutations applied.
///
/// `label` names the file in error messages.
///
/// # Errors
/// Returns [`TagError::Render`] if the edits cannot be applied or the output
/// is not valid Go.
pub fn render(tree: &CstTree, label: &str) -> TagResult<String> {
    let changed = tree.root.has_replacement();
    let mut edits = Vec::new();
    if changed {
        collect_edits(&tree.root, tree, &mut edits)?;
    }

    let mut rewriter = ByteRangeRewriter::new(tree.source.as_str());
    rewriter.add_edits(edits);
    let mut output = rewriter.apply().map_err(rewrite_error)?;

    if !output.is_empty() && !output.ends_with('\n') {
        output.push_str(line_ending(&tree.source));
    }

    if changed {
        CstParser::new()?
            .parse(label, &output)
            .map_err(|e| TagError::Render {
                message: e.to_string(),
            })?;
    }
    tracing::debug!(file = label, changed, bytes = output.len(), "rendered source");

    Ok(output)
}

/// Render one node's text with the mutations inside it applied.
fn render_node(node: &CstNode, tree: &CstTree) -> TagResult<String> {
    let mut edits = Vec::new();
    collect_edits(node, tree, &mut edits)?;

    let mut rewriter = ByteRangeRewriter::new(tree.slice(node.start_byte, node.end_byte));
    rewriter.add_edits(edits.into_iter().map(|e| e.shifted_back(node.start_byte)));
    rewriter.apply().map_err(rewrite_error)
}

fn rewrite_error(err: RewriteError) -> TagError {
    TagError::Render {
        message: err.to_string(),
    }
}

fn collect_edits(node: &CstNode, tree: &CstTree, edits: &mut Vec<Edit>) -> TagResult<()> {
    if node.kind == "struct_type" && has_tag_mutation(node) {
        let text = format_struct(node, tree)?;
        edits.push(Edit::new(node.start_byte, node.end_byte, text));
        return Ok(());
    }

    if let Some(text) = &node.replacement {
        let edit = if node.is_synthesized() {
            Edit::insert(node.start_byte, format!(" {text}"))
        } else {
            Edit::new(node.start_byte, node.end_byte, text.clone())
        };
        edits.push(edit);
        return Ok(());
    }

    for child in &node.children {
        collect_edits(child, tree, edits)?;
    }
    Ok(())
}

/// Whether any direct field of `record` has a changed or new tag.
fn has_tag_mutation(record: &CstNode) -> bool {
    record
        .child_by_kind("field_declaration_list")
        .is_some_and(|list| {
            list.children
                .iter()
                .filter(|c| c.kind == "field_declaration")
                .any(|f| f.child_by_field("tag").is_some_and(|t| t.replacement.is_some()))
        })
}

/// Line terminator of the file, taken from its first line.
fn line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(i) if source[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Source text of a comment without the carriage return a line comment
/// picks up in CRLF files.
fn comment_text<'a>(tree: &'a CstTree, comment: &CstNode) -> &'a str {
    tree.slice(comment.start_byte, comment.end_byte)
        .trim_end_matches('\r')
}

/// Leading whitespace of the line holding `offset`.
fn line_indent<'a>(tree: &'a CstTree, offset: usize) -> &'a str {
    let line = tree.index.line(offset);
    let start = tree.index.line_start(line).unwrap_or(0);
    let text = &tree.source[start..];
    let end = text
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(text.len());
    &text[..end]
}

fn format_struct(record: &CstNode, tree: &CstTree) -> TagResult<String> {
    let outer = line_indent(tree, record.start_byte);
    let eol = line_ending(&tree.source);
    let mut layout = Layout::new(format!("{outer}\t"), eol);
    let mut header = String::from("struct {");

    let Some(list) = record.child_by_kind("field_declaration_list") else {
        return Err(TagError::Render {
            message: "struct type without field list".to_owned(),
        });
    };
    let items: Vec<&CstNode> = list
        .children
        .iter()
        .filter(|c| c.kind == "field_declaration" || c.kind == "comment")
        .collect();

    let line_of = |offset: usize| tree.index.line(offset);
    let mut prev_line = line_of(list.start_byte);
    let mut i = 0;

    // Comments on the same line as the opening brace stay there
    while let Some(comment) = items.get(i).filter(|c| c.kind == "comment") {
        if line_of(comment.start_byte) != prev_line {
            break;
        }
        header.push(' ');
        header.push_str(comment_text(tree, comment));
        prev_line = line_of(comment.end_byte);
        i += 1;
    }

    let mut first = true;
    while let Some(item) = items.get(i) {
        if !first && line_of(item.start_byte) > prev_line + 1 {
            layout.blank();
        }
        first = false;

        if item.kind == "comment" {
            layout.raw(comment_text(tree, item), true);
            prev_line = line_of(item.end_byte);
            i += 1;
            continue;
        }

        // Comments starting on the line where the field ends trail it
        let end_line = line_of(item.end_byte);
        let mut j = i + 1;
        while items
            .get(j)
            .is_some_and(|c| c.kind == "comment" && line_of(c.start_byte) == end_line)
        {
            j += 1;
        }
        let trailing = (j > i + 1).then(|| {
            let last = items[j - 1];
            tree.slice(items[i + 1].start_byte, last.end_byte)
                .trim_end_matches('\r')
                .to_owned()
        });

        format_field(item, trailing, tree, &mut layout)?;
        prev_line = line_of(items[j - 1].end_byte);
        i = j;
    }

    Ok(format!("{header}{eol}{}{outer}}}", layout.finish()))
}

fn format_field(
    field: &CstNode,
    trailing: Option<String>,
    tree: &CstTree,
    layout: &mut Layout,
) -> TagResult<()> {
    let comments: Vec<&CstNode> = field
        .children
        .iter()
        .filter(|c| c.kind == "comment")
        .collect();

    // A line break inside the declaration cannot live in a column
    let breaks_line = |c: &&CstNode| {
        let text = comment_text(tree, c);
        text.starts_with("//") || text.contains('\n')
    };
    if comments.iter().any(breaks_line) {
        return format_field_verbatim(field, trailing, tree, layout);
    }

    let named = field.children_by_field("name").next().is_some();
    let ty = field.child_by_field("type");

    // Names, commas, a pointer star and comments ahead of the type, in order
    let mut lead = String::new();
    for child in field.children.iter().take_while(|c| c.field != Some("type")) {
        if child.kind != "," && !lead.is_empty() {
            lead.push(' ');
        }
        lead.push_str(tree.slice(child.start_byte, child.end_byte));
    }

    let mut type_text = match ty {
        Some(ty) => render_node(ty, tree)?,
        None => String::new(),
    };
    if let Some(ty) = ty {
        for comment in comments.iter().filter(|c| c.start_byte >= ty.end_byte) {
            type_text.push(' ');
            type_text.push_str(comment_text(tree, comment));
        }
    }
    let tag = field
        .child_by_field("tag")
        .map(|t| t.text(&tree.source).to_owned());

    let mut cells = Vec::new();
    if named {
        cells.push(lead);
    } else if !lead.is_empty() {
        // An embedded pointer keeps its `*` glued to the type
        let glue = if lead.ends_with('*') { "" } else { " " };
        type_text = format!("{lead}{glue}{type_text}");
    }

    let mut type_lines = type_text.split('\n').map(|l| l.trim_end_matches('\r'));
    let first_line = type_lines.next().unwrap_or_default();
    let rest: Vec<&str> = type_lines.collect();

    match rest.split_last() {
        None => {
            cells.push(first_line.to_owned());
            layout.row(field_cells(cells, named, tag, trailing));
        }
        Some((last, middle)) => {
            cells.push(first_line.to_owned());
            layout.row(cells);
            layout.flush();
            for line in middle {
                layout.raw(line, false);
            }
            let closing = vec![last.trim_start().to_owned()];
            layout.row(field_cells(closing, named, tag, trailing));
            layout.flush();
        }
    }
    Ok(())
}

/// Emit a field as written, tag edits applied, re-indented to the struct.
fn format_field_verbatim(
    field: &CstNode,
    trailing: Option<String>,
    tree: &CstTree,
    layout: &mut Layout,
) -> TagResult<()> {
    let text = render_node(field, tree)?;
    let original_indent = line_indent(tree, field.start_byte);
    let lines: Vec<&str> = text.lines().collect();

    for (k, &line) in lines.iter().enumerate() {
        let mut line = if k == 0 {
            line.to_owned()
        } else {
            line.strip_prefix(original_indent).unwrap_or(line).to_owned()
        };
        if k + 1 == lines.len() {
            if let Some(comment) = &trailing {
                line.push(' ');
                line.push_str(comment);
            }
        }
        layout.raw(&line, true);
    }
    Ok(())
}

/// Append the tag and trailing comment cells to a row.
///
/// Without a tag, a named field's comment takes the tag column; an embedded
/// field gets an empty cell first so its comment lands in the same column.
fn field_cells(
    mut cells: Vec<String>,
    named: bool,
    tag: Option<String>,
    comment: Option<String>,
) -> Vec<String> {
    match (tag, comment) {
        (Some(tag), Some(comment)) => {
            cells.push(tag);
            cells.push(comment);
        }
        (Some(tag), None) => cells.push(tag),
        (None, Some(comment)) => {
            if !named {
                cells.push(String::new());
            }
            cells.push(comment);
        }
        (None, None) => {}
    }
    cells
}

/// Accumulates the lines of a struct body, aligning consecutive rows.
struct Layout {
    indent: String,
    eol: &'static str,
    pending: Vec<Vec<String>>,
    out: String,
}

impl Layout {
    fn new(indent: String, eol: &'static str) -> Self {
        Self {
            indent,
            eol,
            pending: Vec::new(),
            out: String::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.pending.push(cells);
    }

    /// Align and emit all pending rows; later rows start a new block.
    fn flush(&mut self) {
        for line in align::align(&self.pending) {
            self.out.push_str(&self.indent);
            self.out.push_str(&line);
            self.out.push_str(self.eol);
        }
        self.pending.clear();
    }

    /// Emit a line outside the column layout.
    fn raw(&mut self, text: &str, indented: bool) {
        self.flush();
        if indented {
            self.out.push_str(&self.indent);
        }
        self.out.push_str(text);
        self.out.push_str(self.eol);
    }

    fn blank(&mut self) {
        self.flush();
        self.out.push_str(self.eol);
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}
