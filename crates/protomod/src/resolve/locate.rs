//! Import path resolution.
//!
//! An import is looked up relative to the importing file's directory first,
//! then relative to each include directory in order. Only existence is
//! checked here; file contents are read by the loader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Error, Result};

/// Resolve an import reference to an absolute file path.
///
/// The first existing candidate wins: `base_dir/import`, then
/// `include_dirs[0]/import`, `include_dirs[1]/import`, and so on.
///
/// On exhaustion, the error always carries the base-dir-relative candidate,
/// regardless of how many include directories were tried. Error messages
/// stay stable under include-path reordering.
pub fn resolve_import(
    import: &str,
    base_dir: &Path,
    include_dirs: &[PathBuf],
) -> Result<PathBuf> {
    let first = base_dir.join(import);
    if first.is_file() {
        trace!(import, path = %first.display(), "import resolved relative to importer");
        return canonical(first);
    }

    for dir in include_dirs {
        let candidate = dir.join(import);
        if candidate.is_file() {
            trace!(import, path = %candidate.display(), "import resolved via include dir");
            return canonical(candidate);
        }
    }

    Err(Error::ImportNotFound {
        import: import.to_string(),
        tried: first,
    })
}

/// Canonicalize a path known to exist.
///
/// Canonical paths are the keys of the composition cache, so the same file
/// reached through different directory routes dedups correctly.
fn canonical(path: PathBuf) -> Result<PathBuf> {
    fs::canonicalize(&path).map_err(|source| Error::Read { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_base_dir_candidate_wins() {
        let base = TempDir::new().unwrap();
        let include = TempDir::new().unwrap();
        File::create(base.path().join("a.proto")).unwrap();
        File::create(include.path().join("a.proto")).unwrap();

        let resolved =
            resolve_import("a.proto", base.path(), &[include.path().to_path_buf()]).unwrap();
        assert_eq!(resolved, fs::canonicalize(base.path().join("a.proto")).unwrap());
    }

    #[test]
    fn test_include_dirs_tried_in_order() {
        let base = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        File::create(first.path().join("a.proto")).unwrap();
        File::create(second.path().join("a.proto")).unwrap();

        let resolved = resolve_import(
            "a.proto",
            base.path(),
            &[first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(
            resolved,
            fs::canonicalize(first.path().join("a.proto")).unwrap()
        );
    }

    #[test]
    fn test_failure_reports_first_candidate() {
        let base = TempDir::new().unwrap();
        let include_a = TempDir::new().unwrap();
        let include_b = TempDir::new().unwrap();

        let forward = [
            include_a.path().to_path_buf(),
            include_b.path().to_path_buf(),
        ];
        let reverse = [
            include_b.path().to_path_buf(),
            include_a.path().to_path_buf(),
        ];

        for dirs in [&forward[..], &reverse[..]] {
            let err = resolve_import("missing.proto", base.path(), dirs).unwrap_err();
            match err {
                Error::ImportNotFound { import, tried } => {
                    assert_eq!(import, "missing.proto");
                    assert_eq!(tried, base.path().join("missing.proto"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_subdirectory_imports() {
        let include = TempDir::new().unwrap();
        fs::create_dir(include.path().join("nested")).unwrap();
        File::create(include.path().join("nested").join("a.proto")).unwrap();

        let base = TempDir::new().unwrap();
        let resolved =
            resolve_import("nested/a.proto", base.path(), &[include.path().to_path_buf()])
                .unwrap();
        assert!(resolved.ends_with("nested/a.proto"));
    }
}
