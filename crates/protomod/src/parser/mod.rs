//! Hand-written recursive descent parser for schema files.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead and error recovery
//! - `error`: ParseError kinds and diagnostic rendering
//! - `decl`: declaration parsers (keyword-dispatched)
//!
//! One parse pass reports every error it can find: after a failed
//! declaration the stream synchronizes to the next declaration keyword
//! and continues.

mod decl;
mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
pub use stream::TokenStream;

use std::ops::Range;

use crate::ast::ParsedSchema;
use crate::lexer::Token;

/// Parse a token sequence into a schema.
///
/// # Parameters
/// - `tokens`: tokens with their byte ranges, as produced by [`crate::lexer::lex`]
/// - `file_id`: file identifier for span tracking
///
/// # Returns
/// - `Ok(ParsedSchema)` if parsing succeeds
/// - `Err(Vec<ParseError>)` with every error found otherwise
pub fn parse_schema(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<ParsedSchema, Vec<ParseError>> {
    let mut stream = TokenStream::new(tokens, file_id);
    decl::parse_schema(&mut stream)
}
