//! Compiler errors
//!
//! One error enum covers the whole pipeline. Every variant is fatal to the
//! current invocation: there is no retry and no partial output. The CLI maps
//! [`Error::is_config`] onto a distinct exit code so callers can tell a bad
//! configuration apart from bad input.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Compiler result type
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler errors
#[derive(Debug, Error)]
pub enum Error {
    /// A declared include directory does not exist.
    ///
    /// Checked eagerly when the loader is constructed, before any file is
    /// read or parsed.
    #[error("include directory does not exist: {0}")]
    IncludeDirNotFound(PathBuf),

    /// A schema file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed schema source. `details` carries the formatted diagnostics
    /// (location, snippet, caret underline) for every error found in the
    /// file.
    #[error("{count} parse error(s):\n{details}")]
    Parse { count: usize, details: String },

    /// An import could not be located in the importing file's directory or
    /// any include directory. `tried` is always the base-directory-relative
    /// candidate, independent of include-path ordering, so the reported
    /// path is stable.
    #[error("import \"{import}\" not found (tried {})", tried.display())]
    ImportNotFound { import: String, tried: PathBuf },

    /// A requested output namespace is not a legal path within the composed
    /// schema.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Internal invariant violation (e.g. a composed schema that fails to
    /// serialize).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is a configuration problem rather than an input
    /// or processing failure.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::IncludeDirNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_classification() {
        assert!(Error::IncludeDirNotFound(PathBuf::from("/missing")).is_config());
        assert!(!Error::InvalidNamespace("foo.baz".into()).is_config());
        assert!(!Error::ImportNotFound {
            import: "a.proto".into(),
            tried: PathBuf::from("/tmp/a.proto"),
        }
        .is_config());
    }

    #[test]
    fn test_import_not_found_reports_tried_path() {
        let err = Error::ImportNotFound {
            import: "common.proto".into(),
            tried: PathBuf::from("/schemas/common.proto"),
        };
        let text = err.to_string();
        assert!(text.contains("common.proto"));
        assert!(text.contains("/schemas/common.proto"));
    }
}
