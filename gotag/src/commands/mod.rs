//! Commands module - CLI command implementations.

mod tag;

pub use tag::{run_tag, TagRunOptions};
