//! Per-field tag merging.
//!
//! Decides, for every field declaration of one struct, whether it gets a new
//! tag, an extended tag, or is left alone, and records the decision.

use serde::Serialize;

use super::struct_tag::{is_valid_key, raw_literal, StructTag, TagLiteral, RAW_DELIMITER};
use crate::cst::{CstNode, PositionIndex};
use crate::error::{TagError, TagResult};

/// Decides whether a field name is visible outside its package.
pub type ExportPredicate = fn(&str) -> bool;

/// Go's default export rule: the first character is an uppercase letter.
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The tag to add, and how to build its value from a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    name: String,
    prefix: String,
    suffix: String,
}

impl TagSpec {
    /// Build a tag spec, rejecting names that cannot be written as a tag key.
    ///
    /// # Errors
    /// Returns [`TagError::InvalidTagName`] for an empty name or one holding
    /// whitespace, `:`, `"`, `` ` `` or control characters, and
    /// [`TagError::InvalidTagValue`] for a prefix or suffix holding `` ` ``.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> TagResult<Self> {
        let name = name.into();
        if !is_valid_key(&name) {
            return Err(TagError::InvalidTagName { name });
        }
        let (prefix, suffix) = (prefix.into(), suffix.into());
        for value in [&prefix, &suffix] {
            if value.contains(RAW_DELIMITER) {
                return Err(TagError::InvalidTagValue {
                    value: value.clone(),
                });
            }
        }
        Ok(Self {
            name,
            prefix,
            suffix,
        })
    }

    /// The tag key, e.g. `json`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `prefix + field + suffix`, unescaped.
    #[must_use]
    pub fn value_for(&self, field: &str) -> String {
        format!("{}{field}{}", self.prefix, self.suffix)
    }

    /// The `key:"value"` pair for a field.
    #[must_use]
    pub fn entry_for(&self, field: &str) -> String {
        format!("{}:\"{}\"", self.name, self.value_for(field))
    }
}

/// What happened to one field declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    /// The field had no tag; one was created.
    Added,
    /// The pair was appended to an existing tag.
    Appended,
    /// An all-whitespace tag was replaced.
    Replaced,
    /// The key was already present.
    AlreadyTagged,
    /// The field name is not exported.
    Unexported,
    /// The field is embedded and has no name.
    Embedded,
    /// The declaration names several fields.
    MultipleNames,
}

impl FieldOutcome {
    /// Whether the field's tag was changed.
    #[must_use]
    pub fn is_change(self) -> bool {
        matches!(self, Self::Added | Self::Appended | Self::Replaced)
    }
}

/// One line of the tagging report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    /// Field names, comma separated; the type text for embedded fields.
    pub field: String,
    /// Byte offset where the declaration starts.
    pub start_byte: usize,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Decision taken for the declaration.
    pub outcome: FieldOutcome,
}

/// Tag every eligible field declaration of `record`, a `struct_type` node.
///
/// Only the direct fields are visited; struct types nested in field types
/// are left to their own invocation.
pub fn annotate(
    record: &mut CstNode,
    source: &str,
    index: &PositionIndex,
    spec: &TagSpec,
    exported: ExportPredicate,
) -> Vec<FieldReport> {
    let Some(list) = record
        .children
        .iter_mut()
        .find(|c| c.kind == "field_declaration_list")
    else {
        return Vec::new();
    };

    list.children
        .iter_mut()
        .filter(|c| c.kind == "field_declaration")
        .map(|field| {
            let label = field_label(field, source);
            let start_byte = field.start_byte;
            let outcome = tag_field(field, source, spec, exported);
            tracing::debug!(field = %label, ?outcome, "visited field");
            FieldReport {
                field: label,
                start_byte,
                line: index.line(start_byte),
                outcome,
            }
        })
        .collect()
}

fn field_label(field: &CstNode, source: &str) -> String {
    let names: Vec<&str> = field
        .children_by_field("name")
        .map(|n| &source[n.start_byte..n.end_byte])
        .collect();
    if names.is_empty() {
        field
            .child_by_field("type")
            .map(|t| source[field.start_byte..t.end_byte].to_owned())
            .unwrap_or_default()
    } else {
        names.join(", ")
    }
}

fn tag_field(
    field: &mut CstNode,
    source: &str,
    spec: &TagSpec,
    exported: ExportPredicate,
) -> FieldOutcome {
    let names: Vec<&str> = field
        .children_by_field("name")
        .map(|n| &source[n.start_byte..n.end_byte])
        .collect();
    let name = match names.as_slice() {
        [] => return FieldOutcome::Embedded,
        [one] => *one,
        _ => return FieldOutcome::MultipleNames,
    };
    if !exported(name) {
        return FieldOutcome::Unexported;
    }

    let entry = spec.entry_for(name);
    let anchor = field.end_byte;
    let Some(tag) = field.child_by_field_mut("tag") else {
        field.children.push(CstNode::synthesized(
            "raw_string_literal",
            "tag",
            anchor,
            raw_literal(&entry),
        ));
        return FieldOutcome::Added;
    };

    let literal = tag.text(source).to_owned();
    let Some((form, content)) = TagLiteral::split(&literal) else {
        return FieldOutcome::AlreadyTagged;
    };
    let content = StructTag(&content);

    if content.lookup(spec.name()).is_some() {
        FieldOutcome::AlreadyTagged
    } else if content.is_blank() {
        tag.replacement = Some(raw_literal(&entry));
        FieldOutcome::Replaced
    } else {
        tag.replacement = Some(form.append(&literal, &entry));
        FieldOutcome::Appended
    }
}
