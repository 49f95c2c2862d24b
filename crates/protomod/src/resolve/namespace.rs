//! Output namespace validation.
//!
//! A requested output namespace is legal when it walks a real path through
//! the composed schema: first along the declared `package` segments, then
//! down the nested message/enum tree. The walk threads a pair of slices
//! (the current message and enum candidates) functionally through each
//! segment; matching a message re-points both, matching an enum ends the
//! descent.

use crate::ast::{ComposedSchema, EnumNode, MessageNode};
use crate::foundation::DottedName;

/// Whether `namespace` is a legal output location for `schema`.
///
/// Pure predicate, no side effects. Rules:
///
/// - the string must be a lexically valid [`DottedName`] (one leading dot
///   tolerated);
/// - segments covered by the declared `package` must match it verbatim
///   (any prefix of the package is also fine);
/// - segments past the package must name a message or enum in the current
///   search set, starting from the schema's top-level messages;
/// - the final segment only needs to exist, its own contents are not
///   inspected.
pub fn is_valid_in(namespace: &str, schema: &ComposedSchema) -> bool {
    let Some(name) = DottedName::parse(namespace) else {
        return false;
    };

    let schema = &schema.0;
    let package: Vec<&str> = schema
        .package
        .as_deref()
        .map(|p| p.split('.').collect())
        .unwrap_or_default();

    let mut messages: &[MessageNode] = &schema.messages;
    let mut enums: &[EnumNode] = &[];

    for (i, segment) in name.segments().iter().enumerate() {
        if i < package.len() {
            if segment != package[i] {
                return false;
            }
            continue;
        }

        // Messages are searched before enums.
        if let Some(found) = messages.iter().find(|m| m.name == *segment) {
            messages = &found.messages;
            enums = &found.enums;
        } else if enums.iter().any(|e| e.name == *segment) {
            messages = &[];
            enums = &[];
        } else {
            return false;
        }
    }

    true
}
