//! Names and literals shared across the crate.

/// Configuration file looked up from the target file's directory upwards.
pub const CONFIG_FILENAME: &str = ".gotag.toml";

/// Separator between file name and byte offset in a position descriptor.
pub const POSITION_SEPARATOR: &str = ":#";

/// Logging directive used without `--verbose` when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "gotag=warn";

/// Logging directive used with `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_LOG_DIRECTIVE: &str = "gotag=debug";
