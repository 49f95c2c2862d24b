//! Output projection.
//!
//! A composed schema is serialized once into a JSON data literal, then
//! wrapped per target. The literal is byte-identical across the three
//! wrapping targets; only the surrounding syntax differs. All wrappers
//! share one builder expression parameterized by the resolved namespace,
//! so the outputs are semantically equivalent modulo wrapping:
//!
//! ```text
//! <lib>.newBuilder()["import"](<literal>).build(<"Ns.String">?)
//! ```
//!
//! Bracket syntax for `import` because the word is reserved in older
//! JavaScript engines.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::ast::ComposedSchema;
use crate::error::{Error, Result};
use crate::foundation::DottedName;
use crate::resolve::namespace;

/// Output wrapping convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The composed schema as a structural JSON document, no wrapping.
    Json,
    /// Variable-assignment wrapper building a namespace chain of plain
    /// objects onto a pre-existing global runtime library.
    Shim,
    /// CommonJS `module.exports` wrapper; the runtime library is
    /// `require`d, no global needed.
    CommonJs,
    /// Asynchronous module definition (`define(...)`) wrapper.
    Amd,
}

/// Whitespace policy for the embedded data literal.
///
/// Does not alter semantic content; wrapper line structure is identical
/// in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// 4-space-indented JSON.
    #[default]
    Pretty,
    /// Minified JSON.
    Compact,
}

/// How the wrapping namespace is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceSpec {
    /// No wrapping namespace.
    #[default]
    None,
    /// Use the schema's own declared `package` (none when absent).
    FromPackage,
    /// Use this namespace, validated against the schema.
    Explicit(String),
}

/// Options for [`render`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub target: Target,
    pub namespace: NamespaceSpec,
    pub mode: RenderMode,
    /// Runtime library name referenced by the generated wrapper. Defaults
    /// per target: `ProtoBuf` for shim/AMD (a global / module id),
    /// `protobufjs` for CommonJS (a package name).
    pub dependency: Option<String>,
}

impl Default for Target {
    fn default() -> Self {
        Target::Json
    }
}

/// Render a composed schema as final output text (no trailing newline).
///
/// # Errors
/// [`Error::InvalidNamespace`] when a wrapping target requests a namespace
/// that is not a legal path within the schema. The `Json` target ignores
/// the namespace entirely and never fails validation.
pub fn render(schema: &ComposedSchema, options: &RenderOptions) -> Result<String> {
    let literal = serialize(schema, options.mode)?;

    if options.target == Target::Json {
        return Ok(literal);
    }

    let ns = match &options.namespace {
        NamespaceSpec::None => None,
        NamespaceSpec::Explicit(ns) => Some(ns.clone()),
        NamespaceSpec::FromPackage => schema.0.package.clone(),
    };
    if let Some(ns) = &ns {
        if !namespace::is_valid_in(ns, schema) {
            return Err(Error::InvalidNamespace(ns.clone()));
        }
    }
    let ns = ns.as_deref();

    let dependency = options.dependency.as_deref().unwrap_or(match options.target {
        Target::CommonJs => "protobufjs",
        _ => "ProtoBuf",
    });

    Ok(match options.target {
        Target::Json => unreachable!("handled above"),
        Target::Shim => render_shim(&literal, ns, dependency),
        Target::CommonJs => render_commonjs(&literal, ns, dependency),
        Target::Amd => render_amd(&literal, ns, dependency),
    })
}

/// Serialize the schema into the embedded data literal.
fn serialize(schema: &ComposedSchema, mode: RenderMode) -> Result<String> {
    let result = match mode {
        RenderMode::Compact => serde_json::to_string(schema),
        RenderMode::Pretty => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            schema
                .serialize(&mut ser)
                .map(|()| String::from_utf8_lossy(&buf).into_owned())
        }
    };
    result.map_err(|e| Error::Internal(format!("schema serialization failed: {e}")))
}

/// The builder expression shared by every wrapping target.
fn builder_expr(lib: &str, literal: &str, ns: Option<&str>) -> String {
    let build_arg = match ns {
        Some(ns) => format!("\"{}\"", ns),
        None => String::new(),
    };
    format!("{lib}.newBuilder()[\"import\"]({literal}).build({build_arg})")
}

/// Assignment shim: one `var x = x || {};` binding per namespace segment
/// except the last, then the final segment bound to the built value. The
/// runtime library is expected as a pre-existing global.
fn render_shim(literal: &str, ns: Option<&str>, lib: &str) -> String {
    let builder = builder_expr(lib, literal, ns);
    let Some(ns) = ns else {
        return format!("var root = {};", builder);
    };

    let segments: Vec<&str> = ns.trim_start_matches('.').split('.').collect();
    let mut output = String::new();
    for i in 0..segments.len() - 1 {
        let path = segments[..=i].join(".");
        if i == 0 {
            output.push_str(&format!("var {path} = {path} || {{}};\n"));
        } else {
            output.push_str(&format!("{path} = {path} || {{}};\n"));
        }
    }

    let full = segments.join(".");
    if segments.len() == 1 {
        output.push_str(&format!("var {full} = {};", builder));
    } else {
        output.push_str(&format!("{full} = {};", builder));
    }
    output
}

/// CommonJS export: the runtime library is required, nothing global.
fn render_commonjs(literal: &str, ns: Option<&str>, lib: &str) -> String {
    let builder = builder_expr(&format!("require(\"{lib}\")"), literal, ns);
    format!("module.exports = {};", builder)
}

/// AMD definition. The module id (present only with a namespace) is the
/// namespace with `.` replaced by `/`.
fn render_amd(literal: &str, ns: Option<&str>, lib: &str) -> String {
    let param = factory_param(lib);
    let builder = builder_expr(&param, literal, ns);
    let id = ns
        .and_then(DottedName::parse)
        .map(|name| format!("\"{}\", ", name.join("/")))
        .unwrap_or_default();
    format!(
        "define({id}[\"{lib}\"], function({param}) {{\n    return {};\n}});",
        builder
    )
}

/// Derive a legal JavaScript identifier for the AMD factory parameter from
/// the dependency name (which may be a path like `protobuf/dist/protobuf`).
fn factory_param(dependency: &str) -> String {
    let tail = dependency.rsplit('/').next().unwrap_or(dependency);
    let cleaned: String = tail
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() || cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        "ProtoBuf".to_string()
    } else {
        cleaned
    }
}
