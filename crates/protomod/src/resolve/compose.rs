//! Import graph composition.
//!
//! [`SchemaLoader::load`] parses a root schema and all of its transitive
//! imports into a single [`ComposedSchema`]: each import entry is replaced,
//! in source order, by the fully composed schema of its target. Traversal
//! is synchronous and depth-first; an import's own imports are fully
//! resolved before the next sibling import is processed, which fixes the
//! ordering of the composed tree deterministically.
//!
//! A per-load cache of canonical paths guarantees every file is parsed and
//! inlined at most once. The cache is seeded with the root file itself and
//! each import is recorded *before* its recursive composition, so a cyclic
//! graph (A imports B imports A) terminates: the back-edge is already
//! cached and is omitted exactly like a duplicate import.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::locate;
use crate::ast::ComposedSchema;
use crate::error::{Error, Result};
use crate::foundation::{SourceMap, Span};
use crate::lexer;
use crate::parser::{self, ParseError};

/// Canonical paths already inlined during one top-level load.
///
/// Owned by [`SchemaLoader::load`] and threaded through every recursive
/// composition step; never shared across loads.
pub type ImportCacheSet = BTreeSet<PathBuf>;

/// Loads schema files and composes their import graphs.
///
/// Include directories are validated eagerly at construction: a missing
/// one is a configuration error, reported before any file is parsed.
/// The loader owns the [`SourceMap`] of everything it has read, so parse
/// diagnostics can quote source lines from any file in the graph.
#[derive(Debug)]
pub struct SchemaLoader {
    include_dirs: Vec<PathBuf>,
    sources: SourceMap,
}

impl SchemaLoader {
    /// Create a loader with the given include directories.
    ///
    /// # Errors
    /// [`Error::IncludeDirNotFound`] if any include directory does not
    /// exist on disk.
    pub fn new(include_dirs: Vec<PathBuf>) -> Result<Self> {
        for dir in &include_dirs {
            if !dir.is_dir() {
                return Err(Error::IncludeDirNotFound(dir.clone()));
            }
        }
        Ok(Self {
            include_dirs,
            sources: SourceMap::new(),
        })
    }

    /// Source files read so far, for diagnostics.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Parse `root` and every transitive import into one composed schema.
    ///
    /// Each call starts with a fresh cache: loading the same root twice
    /// yields equal composed trees.
    pub fn load(&mut self, root: &Path) -> Result<ComposedSchema> {
        let root = fs::canonicalize(root).map_err(|source| Error::Read {
            path: root.to_path_buf(),
            source,
        })?;
        let mut cache = ImportCacheSet::new();
        cache.insert(root.clone());
        self.compose(&root, &mut cache)
    }

    fn compose(&mut self, path: &Path, cache: &mut ImportCacheSet) -> Result<ComposedSchema> {
        trace!(path = %path.display(), "composing schema file");
        let parsed = self.parse_file(path)?;

        // Canonical paths always have a parent; "." keeps the fallback sane.
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let base_dir = base_dir.to_path_buf();

        let mut composed = Vec::new();
        for import in &parsed.imports {
            if is_library_import(import) {
                debug!(import, "skipping library-provided import");
                continue;
            }
            let resolved = locate::resolve_import(import, &base_dir, &self.include_dirs)?;
            if !cache.insert(resolved.clone()) {
                debug!(path = %resolved.display(), "import already inlined, omitting");
                continue;
            }
            composed.push(self.compose(&resolved, cache)?);
        }

        Ok(ComposedSchema(parsed.with_imports(composed)))
    }

    /// Read, lex, and parse a single file.
    fn parse_file(&mut self, path: &Path) -> Result<crate::ast::ParsedSchema> {
        let source = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_id = self.sources.add_file(path.to_path_buf(), source.clone());

        let tokens = match lexer::lex(&source) {
            Ok(tokens) => tokens,
            Err(spans) => {
                let errors: Vec<ParseError> = spans
                    .into_iter()
                    .map(|range| {
                        ParseError::invalid_syntax(
                            "unrecognized token",
                            Span::new(file_id, range.start as u32, range.end as u32),
                        )
                    })
                    .collect();
                return Err(self.parse_failure(errors));
            }
        };

        parser::parse_schema(&tokens, file_id).map_err(|errors| self.parse_failure(errors))
    }

    fn parse_failure(&self, errors: Vec<ParseError>) -> Error {
        let details = errors
            .iter()
            .map(|e| e.render(&self.sources))
            .collect::<Vec<_>>()
            .join("\n");
        Error::Parse {
            count: errors.len(),
            details,
        }
    }
}

/// Whether an import names a library-provided schema.
///
/// Descriptor definitions under `google/protobuf/` ship with the runtime
/// library; they are never resolved on disk and never cached.
pub fn is_library_import(import: &str) -> bool {
    import.starts_with("google/protobuf/")
}
