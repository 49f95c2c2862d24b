//! Lexical analysis for schema definition files.
//!
//! Tokenization of protobuf-style schema source using logos.
//!
//! # Design
//!
//! - `Token` — all token types (keywords, punctuation, literals, identifiers)
//! - Comments are stripped during lexing (not tokens)
//! - Token strings defined once in `TOKEN_STRINGS` table (single source of truth for Display)
//!
//! # Examples
//!
//! ```
//! # use protomod::lexer::*;
//! # use logos::Logos;
//! let source = "message Ping { required int32 id = 1; }";
//! let tokens: Vec<Result<Token, ()>> = Token::lexer(source).collect();
//! ```

use logos::Logos;
use std::rc::Rc;

/// Schema token.
///
/// Represents all lexical elements of the schema language: keywords,
/// punctuation, literals, and identifiers.
///
/// Token strings for keywords and punctuation are defined once in the
/// `TOKEN_STRINGS` table and indexed by discriminant for Display.
///
/// # Layout
///
/// Uses `#[repr(u16)]` to guarantee discriminant values are stable and
/// can be safely used to index into `TOKEN_STRINGS`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[repr(u16)]
#[logos(skip r"[ \t\r\n\f]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"/\*([^*]|\*[^/])*\*/")] // Skip /* */ comments
pub enum Token {
    // === Keywords ===
    /// Keyword `syntax`
    #[token("syntax")]
    Syntax,
    /// Keyword `package`
    #[token("package")]
    Package,
    /// Keyword `import`
    #[token("import")]
    Import,
    /// Keyword `public`
    #[token("public")]
    Public,
    /// Keyword `weak`
    #[token("weak")]
    Weak,
    /// Keyword `option`
    #[token("option")]
    Option,
    /// Keyword `message`
    #[token("message")]
    Message,
    /// Keyword `enum`
    #[token("enum")]
    Enum,
    /// Keyword `required`
    #[token("required")]
    Required,
    /// Keyword `optional`
    #[token("optional")]
    Optional,
    /// Keyword `repeated`
    #[token("repeated")]
    Repeated,
    /// Keyword `extend`
    #[token("extend")]
    Extend,
    /// Keyword `extensions`
    #[token("extensions")]
    Extensions,
    /// Keyword `reserved`
    #[token("reserved")]
    Reserved,
    /// Keyword `to` (range bound in extensions/reserved statements)
    #[token("to")]
    To,
    /// Keyword `max` (upper range bound)
    #[token("max")]
    Max,

    // Boolean literals
    /// Boolean literal `true`
    #[token("true")]
    True,
    /// Boolean literal `false`
    #[token("false")]
    False,

    // === Punctuation ===
    /// Punctuation `=`
    #[token("=")]
    Eq,
    /// Punctuation `;`
    #[token(";")]
    Semicolon,
    /// Punctuation `,`
    #[token(",")]
    Comma,
    /// Punctuation `.`
    #[token(".")]
    Dot,
    /// Delimiter `{`
    #[token("{")]
    LBrace,
    /// Delimiter `}`
    #[token("}")]
    RBrace,
    /// Delimiter `[`
    #[token("[")]
    LBracket,
    /// Delimiter `]`
    #[token("]")]
    RBracket,
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,

    // === Literals ===
    /// Integer literal: decimal, hex (`0x1F`), or octal (`052`), with
    /// optional leading sign.
    ///
    /// Out-of-range values fail the callback and surface as lexer errors
    /// with the offending span.
    #[regex(r"-?(0[xX][0-9a-fA-F]+|[0-9]+)", |lex| parse_int(lex.slice()))]
    Int(i64),

    /// Float literal (e.g., 3.14, .5, 1e10), with optional leading sign.
    #[regex(r"-?[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// String literal, double- or single-quoted.
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1]).map(|s| Rc::from(s.as_str()))
    })]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1]).map(|s| Rc::from(s.as_str()))
    })]
    String(Rc<str>),

    /// Identifier (e.g., int32, Outer, my_field).
    ///
    /// Simple identifier without dots. Dotted references are parsed as
    /// sequences of Ident separated by Dot tokens.
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Parse an integer literal, handling sign and hex/octal prefixes.
fn parse_int(s: &str) -> Option<i64> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if neg { -value } else { value })
}

/// Unescape a string literal content.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(_) => {
                    // Unsupported escape sequence
                    return None;
                }
                None => return None, // Trailing backslash
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// Tokenize source text, pairing each token with its byte range.
///
/// On failure, returns the byte ranges of every unrecognized character run
/// so callers can report all lexical errors at once.
pub fn lex(source: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>, Vec<std::ops::Range<usize>>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => errors.push(lexer.span()),
        }
    }
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Token string lookup table.
///
/// Maps discriminant indices to their string representation.
/// This is the single source of truth for token display strings,
/// indexed by the enum discriminant order.
///
/// NOTE: The `#[token("...")]` attributes above must match these strings.
/// This duplication is unavoidable due to logos requiring literal strings,
/// but this table at least consolidates Display logic to avoid a large match.
const TOKEN_STRINGS: &[&str] = &[
    "syntax",
    "package",
    "import",
    "public",
    "weak",
    "option",
    "message",
    "enum",
    "required",
    "optional",
    "repeated",
    "extend",
    "extensions",
    "reserved",
    "to",
    "max", // keywords
    "true",
    "false", // booleans
    "=",
    ";",
    ",",
    ".", // punctuation
    "{",
    "}",
    "[",
    "]",
    "(",
    ")", // delimiters
];

impl Token {
    /// Get the index into TOKEN_STRINGS for simple tokens.
    ///
    /// # Safety
    ///
    /// Safe due to `#[repr(u16)]` on Token enum ensuring stable discriminants.
    fn token_string_index(&self) -> usize {
        // Safe: Token has #[repr(u16)] so discriminant values are stable
        let discriminant = unsafe { *(self as *const Token as *const u16) };
        discriminant as usize
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Literals with data (not in TOKEN_STRINGS table)
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Ident(id) => write!(f, "{}", id),

            // Simple tokens (keywords, punctuation, delimiters)
            _ => {
                let idx = self.token_string_index();
                let s = TOKEN_STRINGS
                    .get(idx)
                    .expect("BUG: token discriminant out of bounds for TOKEN_STRINGS");
                write!(f, "{}", s)
            }
        }
    }
}
