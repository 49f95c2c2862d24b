//! Token stream wrapper for the hand-written parser.

use std::ops::Range;

use crate::foundation::Span;
use crate::lexer::Token;

/// Token stream with lookahead and position tracking.
///
/// Each token is paired with its byte range from the source, enabling
/// accurate error message locations.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream from tokens with their byte spans.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the consumed one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token kind.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Expect a specific token and advance past it.
    ///
    /// Returns an error if the current token doesn't match.
    pub fn expect(&mut self, expected: Token) -> Result<Span, super::ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(super::ParseError::expected_token(
                expected,
                self.peek().cloned(),
                self.current_span(),
            ))
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get a span for the current token.
    ///
    /// At EOF the span is a zero-length span at the end of the last token,
    /// so errors about truncated input still point somewhere useful.
    pub fn current_span(&self) -> Span {
        if let Some((_, range)) = self.tokens.get(self.pos) {
            Span::new(self.file_id, range.start as u32, range.end as u32)
        } else if let Some((_, range)) = self.tokens.last() {
            Span::new(self.file_id, range.end as u32, range.end as u32)
        } else {
            Span::zero(self.file_id)
        }
    }

    /// Synchronize to the next declaration keyword for error recovery.
    ///
    /// Skips tokens until a declaration keyword or EOF, so one parse pass
    /// can report multiple errors.
    pub fn synchronize(&mut self) {
        while !self.at_end() {
            match self.peek() {
                Some(Token::Syntax)
                | Some(Token::Package)
                | Some(Token::Import)
                | Some(Token::Option)
                | Some(Token::Message)
                | Some(Token::Enum)
                | Some(Token::Extend) => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Get the file_id for this token stream.
    pub fn file_id(&self) -> u16 {
        self.file_id
    }
}
