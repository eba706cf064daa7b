//! Offset to struct resolution.

use crate::cst::CstNode;
use crate::error::{TagError, TagResult};

const STRUCT_KIND: &str = "struct_type";

/// Child-index path from `root` to the innermost struct type whose span
/// contains `offset` (both ends inclusive).
///
/// Subtrees that do not contain the offset are skipped. Among candidates the
/// last one met in pre-order wins, which is the most deeply nested.
#[must_use]
pub fn struct_path(root: &CstNode, offset: usize) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    let mut best = None;
    search(root, offset, &mut path, &mut best);
    best
}

fn search(node: &CstNode, offset: usize, path: &mut Vec<usize>, best: &mut Option<Vec<usize>>) {
    for (i, child) in node.children.iter().enumerate() {
        if !child.contains_offset(offset) {
            continue;
        }
        path.push(i);
        if child.kind == STRUCT_KIND {
            *best = Some(path.clone());
        }
        search(child, offset, path, best);
        path.pop();
    }
}

/// Innermost struct type around `offset`.
///
/// # Errors
/// Returns [`TagError::NotFound`] when no struct type contains the offset.
pub fn find_struct(root: &CstNode, offset: usize) -> TagResult<&CstNode> {
    let path = struct_path(root, offset).ok_or(TagError::NotFound { offset })?;
    Ok(path.iter().fold(root, |node, &i| &node.children[i]))
}

/// Mutable variant of [`find_struct`].
///
/// # Errors
/// Returns [`TagError::NotFound`] when no struct type contains the offset.
pub fn find_struct_mut(root: &mut CstNode, offset: usize) -> TagResult<&mut CstNode> {
    let path = struct_path(root, offset).ok_or(TagError::NotFound { offset })?;
    let mut node = root;
    for i in path {
        node = &mut node.children[i];
    }
    Ok(node)
}
