//! Parse error types and diagnostic formatting.

use std::fmt;

use crate::foundation::{SourceMap, Span};
use crate::lexer::Token;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was expected but a different one was found.
    UnexpectedToken,

    /// Input ended while a construct was incomplete (unclosed block,
    /// truncated declaration).
    UnexpectedEof,

    /// Tokens are present but violate the grammar (e.g. a field tag that
    /// is not an unsigned integer).
    InvalidSyntax,

    /// A declaration that may appear at most once appeared again
    /// (e.g. a second `package` statement).
    Duplicate,
}

impl ParseError {
    /// Create an "expected token" error.
    pub fn expected_token(expected: Token, found: Option<Token>, span: Span) -> Self {
        let message = match &found {
            Some(token) => format!("expected '{}', found '{}'", expected, token),
            None => format!("expected '{}', found end of input", expected),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("unexpected '{}' {}", token, context),
            None => format!("unexpected end of input {}", context),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            span,
            message: message.into(),
        }
    }

    /// Create a "duplicate declaration" error.
    pub fn duplicate(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Duplicate,
            span,
            message: message.into(),
        }
    }

    /// Format this error with source context from a [`SourceMap`].
    ///
    /// Produces a location line and the offending source line with a caret
    /// underline:
    ///
    /// ```text
    /// error: expected ';', found '}'
    ///   --> demo.proto:3:18
    ///     required int32 id = 1
    ///                     ^
    /// ```
    pub fn render(&self, sources: &SourceMap) -> String {
        let mut output = String::new();
        output.push_str(&format!("error: {}\n", self.message));

        let path = sources.file_path(&self.span);
        let (line, col) = sources.line_col(&self.span);
        output.push_str(&format!("  --> {}:{}:{}\n", path.display(), line, col));

        let file = sources.file(&self.span);
        if let Some(text) = file.line_text(line) {
            output.push_str(&format!("    {}\n", text));
            let width = (self.span.end.saturating_sub(self.span.start)).max(1) as usize;
            // Clamp the underline to the visible line.
            let width = width.min(text.len().saturating_sub(col as usize - 1).max(1));
            output.push_str(&format!(
                "    {}{}\n",
                " ".repeat(col as usize - 1),
                "^".repeat(width)
            ));
        }

        output
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
