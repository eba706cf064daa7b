//! Byte-range rewriting shared by the printer.
//!
//! The core component is `ByteRangeRewriter`, which applies
//! edits using byte offsets to safely modify source code.

mod rewriter;

pub use rewriter::{ByteRangeRewriter, Edit, RewriteError};
