//! Schema AST node types.
//!
//! One parsed schema file becomes a [`Schema`], generic over its import
//! payload. The parser produces [`ParsedSchema`] (imports are the raw
//! strings as written in source); import composition replaces each import
//! with the fully composed schema of its target, producing
//! [`ComposedSchema`].
//!
//! Serialization order is fixed by declaration order below and is part of
//! the output contract: the structural projection and the embedded data
//! literal of the wrapping projections both use it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One schema file, generic over the import representation.
///
/// `package` is always serialized (as `null` when absent); `syntax` is
/// omitted when the file declares none. The container fields serialize
/// even when empty so composed output has a stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema<I> {
    /// Declared `package`, a dotted namespace string.
    pub package: Option<String>,
    /// Declared `syntax` (e.g. `"proto2"`), when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub syntax: Option<String>,
    /// Imports in source order.
    pub imports: Vec<I>,
    /// File-level options in source order.
    pub options: IndexMap<String, Constant>,
    /// Top-level messages in source order.
    pub messages: Vec<MessageNode>,
    /// Top-level enums in source order.
    pub enums: Vec<EnumNode>,
}

/// A schema as parsed from one file: imports are raw reference strings.
pub type ParsedSchema = Schema<String>;

/// A schema with every import replaced by the composed schema of its
/// target, element-for-element in original order, after dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComposedSchema(pub Schema<ComposedSchema>);

// Not derived: the derive would bound `I: Default`.
impl<I> Default for Schema<I> {
    fn default() -> Self {
        Self {
            package: None,
            syntax: None,
            imports: Vec::new(),
            options: IndexMap::new(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }
}

impl<I> Schema<I> {
    /// Rebuild this schema with a different import payload.
    ///
    /// Everything except `imports` is carried over unchanged.
    pub fn with_imports<J>(self, imports: Vec<J>) -> Schema<J> {
        Schema {
            package: self.package,
            syntax: self.syntax,
            imports,
            options: self.options,
            messages: self.messages,
            enums: self.enums,
        }
    }
}

/// A message declaration: a named field container that is also a
/// namespace node (nested messages and enums).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageNode {
    pub name: String,
    pub fields: Vec<FieldNode>,
    pub messages: Vec<MessageNode>,
    pub enums: Vec<EnumNode>,
    pub options: IndexMap<String, Constant>,
}

/// A message field.
///
/// The type reference is kept verbatim (possibly dotted or leading-dotted);
/// resolving it against declared types is the runtime library's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    /// `"required"`, `"optional"`, or `"repeated"`. A field written
    /// without a rule parses as `"optional"`.
    pub rule: String,
    /// Raw type reference as written (e.g. `int32`, `.foo.Bar`).
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    /// Field tag.
    pub id: u32,
    /// Bracketed field options (`[default = ...]` and friends).
    pub options: IndexMap<String, Constant>,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumNode {
    pub name: String,
    pub values: Vec<EnumValueNode>,
    pub options: IndexMap<String, Constant>,
}

/// A single enum value. Values may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueNode {
    pub name: String,
    pub id: i32,
}

/// A constant as it appears in option values and field defaults.
///
/// Serializes untagged, so each variant becomes the matching JSON scalar.
/// Bare identifiers (enum-value defaults, `inf`, `nan`) are kept as
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}
