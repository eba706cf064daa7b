//! Error type shared by every stage of a tagging run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving, parsing, tagging or rendering a Go file.
///
/// Every variant is terminal for the run; nothing is retried.
#[derive(Debug, Error)]
pub enum TagError {
    /// The position specifier does not contain exactly one `:#` separator.
    #[error("{spec:?}: invalid file position")]
    InvalidPosition {
        /// The specifier as given on the command line.
        spec: String,
    },

    /// The part after `:#` is not a decimal number.
    #[error("{spec:?}: non-numeric line number")]
    NonNumericOffset {
        /// The specifier as given on the command line.
        spec: String,
    },

    /// The file named by the specifier does not exist.
    #[error("no such file: {}", path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The grammar could not be loaded into the parser runtime.
    #[error("failed to create Go parser: {0}")]
    ParserInit(String),

    /// The source is not valid Go.
    #[error("{file}:{line}:{column}: {message}")]
    Parse {
        /// File name used for diagnostics.
        file: String,
        /// 1-based line.
        line: usize,
        /// 1-based column (bytes).
        column: usize,
        /// What the parser expected or found.
        message: String,
    },

    /// No struct type encloses the requested offset.
    #[error("no struct found at offset {offset}")]
    NotFound {
        /// The byte offset that was searched for.
        offset: usize,
    },

    /// The tag name cannot be written as a struct tag key.
    #[error("invalid tag name {name:?}")]
    InvalidTagName {
        /// The rejected name.
        name: String,
    },

    /// A prefix or suffix would break the raw string literal holding the tag.
    #[error("invalid tag value part {value:?}: must not contain a backquote")]
    InvalidTagValue {
        /// The rejected prefix or suffix.
        value: String,
    },

    /// The mutated tree could not be turned back into valid source.
    #[error("failed to render source: {message}")]
    Render {
        /// Description of the broken invariant.
        message: String,
    },
}

/// Result alias used across the library.
pub type TagResult<T> = Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_messages_quote_the_spec() {
        let err = TagError::InvalidPosition {
            spec: "file.go".to_owned(),
        };
        assert_eq!(err.to_string(), r#""file.go": invalid file position"#);

        let err = TagError::NonNumericOffset {
            spec: "file.go:#a".to_owned(),
        };
        assert_eq!(err.to_string(), r#""file.go:#a": non-numeric line number"#);
    }

    #[test]
    fn test_parse_error_display() {
        let err = TagError::Parse {
            file: "testdata/foo.go".to_owned(),
            line: 1,
            column: 1,
            message: "expected 'package', found 'EOF'".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "testdata/foo.go:1:1: expected 'package', found 'EOF'"
        );
    }

    #[test]
    fn test_not_found_names_offset() {
        let err = TagError::NotFound { offset: 7 };
        assert_eq!(err.to_string(), "no struct found at offset 7");
    }
}
