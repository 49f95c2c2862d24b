//! High-level compilation API.
//!
//! Ties the loader and the renderer together into the one call the CLI
//! (and library consumers) use.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::emit::{self, RenderOptions};
use crate::error::Result;
use crate::resolve::SchemaLoader;

/// Compile a root schema file into final output text.
///
/// Steps:
/// 1. Validate every include directory (missing ones are configuration
///    errors, reported before any file is read).
/// 2. Parse the root schema and compose its transitive imports, inlining
///    every file exactly once.
/// 3. Render the composed schema per the requested target, namespace, and
///    mode.
///
/// The returned text carries no trailing newline; callers append one when
/// writing to a stream.
pub fn compile(root: &Path, include_dirs: &[PathBuf], options: &RenderOptions) -> Result<String> {
    let mut loader = SchemaLoader::new(include_dirs.to_vec())?;
    let schema = loader.load(root)?;
    debug!(files = loader.sources().file_count(), "schema graph composed");
    emit::render(&schema, options)
}
