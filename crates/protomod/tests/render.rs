//! Rendering properties, end to end from source files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use protomod::emit::{NamespaceSpec, RenderMode, RenderOptions, Target};
use protomod::error::Error;
use protomod::resolve::{self, SchemaLoader};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn options(target: Target, namespace: NamespaceSpec) -> RenderOptions {
    RenderOptions {
        target,
        namespace,
        mode: RenderMode::Compact,
        dependency: None,
    }
}

/// Schema from the namespace-validation examples: `package foo.bar` with a
/// top-level `Message`.
fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = write(
        &dir,
        "schema.proto",
        "package foo.bar;\nmessage Message { optional int32 x = 1; }\n",
    );
    (dir, root)
}

#[test]
fn test_namespace_validation_examples() {
    let (_dir, root) = fixture();
    let mut loader = SchemaLoader::new(vec![]).unwrap();
    let schema = loader.load(&root).unwrap();

    assert!(resolve::is_valid_in("foo.bar", &schema));
    assert!(!resolve::is_valid_in("foo.baz", &schema));
    assert!(resolve::is_valid_in("foo.bar.Message", &schema));
    assert!(!resolve::is_valid_in("foo.bar.Missing", &schema));
}

#[test]
fn test_data_literal_identical_across_wrapping_targets() {
    let (_dir, root) = fixture();
    let json = protomod::compile(&root, &[], &options(Target::Json, NamespaceSpec::None)).unwrap();

    for target in [Target::Shim, Target::CommonJs, Target::Amd] {
        let opts = options(target, NamespaceSpec::FromPackage);
        let text = protomod::compile(&root, &[], &opts).unwrap();
        assert!(
            text.contains(&json),
            "embedded literal differs for {target:?}"
        );
        assert!(text.contains(".build(\"foo.bar\")"));
    }
}

#[test]
fn test_pretty_and_compact_semantically_equal() {
    let (_dir, root) = fixture();
    let compact = protomod::compile(&root, &[], &options(Target::Json, NamespaceSpec::None)).unwrap();
    let pretty = protomod::compile(
        &root,
        &[],
        &RenderOptions {
            mode: RenderMode::Pretty,
            ..options(Target::Json, NamespaceSpec::None)
        },
    )
    .unwrap();

    assert_ne!(compact, pretty);
    let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
    let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_composed_imports_appear_in_literal() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dep.proto", "package dep;\nmessage D {}\n");
    let root = write(&dir, "root.proto", "import \"dep.proto\";\n");

    let text = protomod::compile(&root, &[], &options(Target::CommonJs, NamespaceSpec::None)).unwrap();
    assert!(text.contains("\"package\":\"dep\""));
    assert!(text.starts_with("module.exports = require(\"protobufjs\")"));
}

#[test]
fn test_amd_id_derived_from_namespace() {
    let (_dir, root) = fixture();
    let opts = options(Target::Amd, NamespaceSpec::Explicit("foo.bar.Message".into()));
    let text = protomod::compile(&root, &[], &opts).unwrap();
    assert!(text.starts_with("define(\"foo/bar/Message\", [\"ProtoBuf\"],"));
}

#[test]
fn test_shim_builds_namespace_chain() {
    let (_dir, root) = fixture();
    let opts = options(Target::Shim, NamespaceSpec::Explicit("foo.bar.Message".into()));
    let text = protomod::compile(&root, &[], &opts).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "var foo = foo || {};");
    assert_eq!(lines[1], "foo.bar = foo.bar || {};");
    assert!(lines[2].starts_with("foo.bar.Message = ProtoBuf.newBuilder()"));
}

#[test]
fn test_invalid_namespace_fatal_for_wrappers_only() {
    let (_dir, root) = fixture();
    let bad = NamespaceSpec::Explicit("foo.baz".into());

    for target in [Target::Shim, Target::CommonJs, Target::Amd] {
        match protomod::compile(&root, &[], &options(target, bad.clone())).unwrap_err() {
            Error::InvalidNamespace(ns) => assert_eq!(ns, "foo.baz"),
            other => panic!("expected InvalidNamespace, got {other:?}"),
        }
    }

    // The structural target ignores the namespace entirely.
    assert!(protomod::compile(&root, &[], &options(Target::Json, bad)).is_ok());
}

#[test]
fn test_dependency_override_applies_to_all_wrappers() {
    let (_dir, root) = fixture();
    for target in [Target::Shim, Target::CommonJs, Target::Amd] {
        let opts = RenderOptions {
            dependency: Some("MyRuntime".into()),
            ..options(target, NamespaceSpec::None)
        };
        let text = protomod::compile(&root, &[], &opts).unwrap();
        assert!(text.contains("MyRuntime"), "missing override for {target:?}");
    }
}
