//! Dotted-name representation for namespaces
//!
//! Namespaces and qualified references are dot-separated identifiers:
//! - `My.Game.Things`
//! - `foo.bar`
//!
//! Unlike a raw string split, [`DottedName::parse`] validates the lexical
//! grammar: every segment is a non-empty run of letters, digits, or
//! underscores. A single leading dot (fully-qualified form) is tolerated
//! and stripped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated dot-separated identifier path.
///
/// # Examples
///
/// ```
/// # use protomod::foundation::DottedName;
/// let name = DottedName::parse("My.Game").unwrap();
/// assert_eq!(name.segments(), &["My", "Game"]);
/// assert_eq!(name.to_string(), "My.Game");
/// assert!(DottedName::parse("My..Game").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DottedName {
    segments: Vec<String>,
}

impl DottedName {
    /// Parse and validate a dotted name.
    ///
    /// Returns `None` when the string is empty, contains an empty segment,
    /// or contains a character outside `[A-Za-z0-9_]` and `.`. At most one
    /// leading dot is accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return None;
        }
        let mut segments = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() {
                return None;
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return None;
            }
            segments.push(segment.to_string());
        }
        Some(Self { segments })
    }

    /// Get the name segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed name; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Join segments with a separator.
    pub fn join(&self, sep: &str) -> String {
        self.segments.join(sep)
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl PartialEq<&str> for DottedName {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let name = DottedName::parse("a.b.c").unwrap();
        assert_eq!(name.segments(), &["a", "b", "c"]);
        assert_eq!(name.len(), 3);
    }

    #[test]
    fn test_parse_single_segment() {
        let name = DottedName::parse("Message").unwrap();
        assert_eq!(name.segments(), &["Message"]);
    }

    #[test]
    fn test_leading_dot_stripped() {
        let name = DottedName::parse(".foo.bar").unwrap();
        assert_eq!(name, "foo.bar");
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert!(DottedName::parse("").is_none());
        assert!(DottedName::parse(".").is_none());
        assert!(DottedName::parse("a..b").is_none());
        assert!(DottedName::parse("a.b.").is_none());
        assert!(DottedName::parse("..a").is_none());
        assert!(DottedName::parse("a b").is_none());
        assert!(DottedName::parse("a-b").is_none());
    }

    #[test]
    fn test_digits_and_underscores_allowed() {
        let name = DottedName::parse("pkg_1.v2").unwrap();
        assert_eq!(name.to_string(), "pkg_1.v2");
    }

    #[test]
    fn test_join() {
        let name = DottedName::parse("My.Game.Things").unwrap();
        assert_eq!(name.join("/"), "My/Game/Things");
    }
}
