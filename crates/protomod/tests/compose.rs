//! Import composition properties, end to end on real files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use protomod::error::Error;
use protomod::resolve::SchemaLoader;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn to_json(schema: &protomod::ast::ComposedSchema) -> serde_json::Value {
    serde_json::to_value(schema).unwrap()
}

#[test]
fn test_idempotent_load() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dep.proto", "package dep;\nmessage D {}\n");
    let root = write(
        &dir,
        "root.proto",
        "package root;\nimport \"dep.proto\";\nmessage R { optional dep.D d = 1; }\n",
    );

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let first = loader.load(&root).unwrap();
    let second = loader.load(&root).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_diamond_import_inlined_once() {
    // R imports A and B; both import C. C must appear exactly once,
    // nested under A (its first encounter in depth-first order).
    let dir = TempDir::new().unwrap();
    write(&dir, "c.proto", "package c;\nmessage C {}\n");
    write(&dir, "a.proto", "package a;\nimport \"c.proto\";\n");
    write(&dir, "b.proto", "package b;\nimport \"c.proto\";\n");
    let root = write(
        &dir,
        "r.proto",
        "package r;\nimport \"a.proto\";\nimport \"b.proto\";\n",
    );

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let composed = loader.load(&root).unwrap();
    let value = to_json(&composed);

    // Composed imports of R = [A(with C inlined), B(with C omitted)].
    assert_eq!(value["imports"].as_array().unwrap().len(), 2);
    assert_eq!(value["imports"][0]["package"], "a");
    assert_eq!(value["imports"][0]["imports"][0]["package"], "c");
    assert_eq!(value["imports"][1]["package"], "b");
    assert_eq!(value["imports"][1]["imports"], serde_json::json!([]));

    // C's content appears exactly once in the whole tree.
    let text = serde_json::to_string(&composed).unwrap();
    assert_eq!(text.matches("\"C\"").count(), 1);
}

#[test]
fn test_sibling_imports_stay_in_source_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "one.proto", "package one;\n");
    write(&dir, "two.proto", "package two;\n");
    write(&dir, "three.proto", "package three;\n");
    let root = write(
        &dir,
        "r.proto",
        "import \"two.proto\";\nimport \"three.proto\";\nimport \"one.proto\";\n",
    );

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let value = to_json(&loader.load(&root).unwrap());
    let packages: Vec<&str> = value["imports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["package"].as_str().unwrap())
        .collect();
    assert_eq!(packages, vec!["two", "three", "one"]);
}

#[test]
fn test_import_cycle_terminates() {
    // A imports B imports A. The back-edge hits the cache (seeded with
    // the root) and is omitted like any duplicate.
    let dir = TempDir::new().unwrap();
    write(&dir, "b.proto", "package b;\nimport \"a.proto\";\n");
    let root = write(&dir, "a.proto", "package a;\nimport \"b.proto\";\n");

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let value = to_json(&loader.load(&root).unwrap());

    assert_eq!(value["package"], "a");
    assert_eq!(value["imports"][0]["package"], "b");
    assert_eq!(value["imports"][0]["imports"], serde_json::json!([]));
}

#[test]
fn test_self_import_suppressed() {
    let dir = TempDir::new().unwrap();
    let root = write(&dir, "a.proto", "package a;\nimport \"a.proto\";\n");

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let value = to_json(&loader.load(&root).unwrap());
    assert_eq!(value["imports"], serde_json::json!([]));
}

#[test]
fn test_repeated_direct_import_deduped() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dep.proto", "package dep;\n");
    let root = write(
        &dir,
        "r.proto",
        "import \"dep.proto\";\nimport \"dep.proto\";\n",
    );

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let value = to_json(&loader.load(&root).unwrap());
    assert_eq!(value["imports"].as_array().unwrap().len(), 1);
}

#[test]
fn test_same_file_via_different_routes_deduped() {
    // dep is reachable base-dir-relative from the root and via an include
    // dir from a subdirectory import; canonical paths must collapse them.
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir, "dep.proto", "package dep;\n");
    fs::write(
        dir.path().join("sub").join("mid.proto"),
        "package mid;\nimport \"dep.proto\";\n",
    )
    .unwrap();
    let root = write(
        &dir,
        "r.proto",
        "import \"dep.proto\";\nimport \"sub/mid.proto\";\n",
    );

    let mut loader = SchemaLoader::new(vec![dir.path().to_path_buf()]).unwrap();
    let value = to_json(&loader.load(&root).unwrap());

    assert_eq!(value["imports"][0]["package"], "dep");
    assert_eq!(value["imports"][1]["package"], "mid");
    assert_eq!(value["imports"][1]["imports"], serde_json::json!([]));
}

#[test]
fn test_unresolved_import_reports_first_candidate() {
    let dir = TempDir::new().unwrap();
    let include_a = TempDir::new().unwrap();
    let include_b = TempDir::new().unwrap();
    let root = write(&dir, "r.proto", "import \"missing.proto\";\n");

    for dirs in [
        vec![include_a.path().to_path_buf(), include_b.path().to_path_buf()],
        vec![include_b.path().to_path_buf(), include_a.path().to_path_buf()],
    ] {
        let mut loader = SchemaLoader::new(dirs).unwrap();
        match loader.load(&root).unwrap_err() {
            Error::ImportNotFound { import, tried } => {
                assert_eq!(import, "missing.proto");
                assert_eq!(
                    tried,
                    fs::canonicalize(dir.path()).unwrap().join("missing.proto")
                );
            }
            other => panic!("expected ImportNotFound, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_failure_in_import_aborts_whole_build() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bad.proto", "message {}\n");
    let root = write(&dir, "r.proto", "import \"bad.proto\";\nmessage Ok {}\n");

    let mut loader = SchemaLoader::new(vec![]).unwrap();
    match loader.load(&root).unwrap_err() {
        Error::Parse { details, .. } => assert!(details.contains("bad.proto")),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn test_missing_include_dir_rejected_at_construction() {
    let missing = PathBuf::from("/definitely/not/here");
    match SchemaLoader::new(vec![missing.clone()]).unwrap_err() {
        Error::IncludeDirNotFound(path) => assert_eq!(path, missing),
        other => panic!("expected IncludeDirNotFound, got {other:?}"),
    }
}
