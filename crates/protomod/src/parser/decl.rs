//! Declaration parsers (keyword-dispatched).
//!
//! Top-level schema statements: `syntax`, `package`, `import`, `option`,
//! `message`, `enum`, `extend`. Message bodies additionally accept fields,
//! nested messages/enums, `extensions`, and `reserved`.
//!
//! `extend`, `extensions`, and `reserved` are accepted and discarded so
//! real-world files load; their content plays no part in the output.

use indexmap::IndexMap;

use super::{ParseError, TokenStream};
use crate::ast::{Constant, EnumNode, EnumValueNode, FieldNode, MessageNode, ParsedSchema};
use crate::lexer::Token;

/// Parse a whole schema file from a token stream.
///
/// Collects every error found: after a failed declaration the stream is
/// synchronized to the next declaration keyword and parsing continues.
pub fn parse_schema(stream: &mut TokenStream) -> Result<ParsedSchema, Vec<ParseError>> {
    let mut schema = ParsedSchema::default();
    let mut errors = Vec::new();
    let mut package_seen = false;

    while !stream.at_end() {
        match parse_declaration(stream, &mut schema, &mut package_seen) {
            Ok(()) => {}
            Err(e) => {
                errors.push(e);
                stream.synchronize();
            }
        }
    }

    if errors.is_empty() {
        Ok(schema)
    } else {
        Err(errors)
    }
}

/// Parse a single top-level declaration (keyword-dispatched).
fn parse_declaration(
    stream: &mut TokenStream,
    schema: &mut ParsedSchema,
    package_seen: &mut bool,
) -> Result<(), ParseError> {
    match stream.peek() {
        // Stray semicolons are tolerated at every block level.
        Some(Token::Semicolon) => {
            stream.advance();
            Ok(())
        }
        Some(Token::Syntax) => parse_syntax(stream, schema),
        Some(Token::Package) => parse_package(stream, schema, package_seen),
        Some(Token::Import) => {
            let import = parse_import(stream)?;
            schema.imports.push(import);
            Ok(())
        }
        Some(Token::Option) => {
            let (name, value) = parse_option(stream)?;
            schema.options.insert(name, value);
            Ok(())
        }
        Some(Token::Message) => {
            let message = parse_message(stream)?;
            schema.messages.push(message);
            Ok(())
        }
        Some(Token::Enum) => {
            let node = parse_enum(stream)?;
            schema.enums.push(node);
            Ok(())
        }
        Some(Token::Extend) => parse_extend(stream),
        other => Err(ParseError::unexpected_token(
            other,
            "at top-level declaration",
            stream.current_span(),
        )),
    }
}

/// Parse `syntax = "proto2";`.
fn parse_syntax(stream: &mut TokenStream, schema: &mut ParsedSchema) -> Result<(), ParseError> {
    stream.expect(Token::Syntax)?;
    stream.expect(Token::Eq)?;
    let value = expect_string(stream, "where a syntax literal is required")?;
    stream.expect(Token::Semicolon)?;
    schema.syntax = Some(value);
    Ok(())
}

/// Parse `package foo.bar;`. At most one per file.
fn parse_package(
    stream: &mut TokenStream,
    schema: &mut ParsedSchema,
    package_seen: &mut bool,
) -> Result<(), ParseError> {
    let span = stream.current_span();
    stream.expect(Token::Package)?;
    let name = parse_dotted_name(stream)?;
    stream.expect(Token::Semicolon)?;
    if *package_seen {
        return Err(ParseError::duplicate(
            format!("duplicate package declaration '{}'", name),
            span,
        ));
    }
    *package_seen = true;
    schema.package = Some(name);
    Ok(())
}

/// Parse `import ["public"|"weak"] "path";` and return the raw path.
///
/// The `public`/`weak` modifier is accepted but not recorded: composition
/// inlines every import the same way.
fn parse_import(stream: &mut TokenStream) -> Result<String, ParseError> {
    stream.expect(Token::Import)?;
    if matches!(stream.peek(), Some(Token::Public) | Some(Token::Weak)) {
        stream.advance();
    }
    let path = expect_string(stream, "where an import path is required")?;
    stream.expect(Token::Semicolon)?;
    Ok(path)
}

/// Parse `option name = constant;` and return the pair.
fn parse_option(stream: &mut TokenStream) -> Result<(String, Constant), ParseError> {
    stream.expect(Token::Option)?;
    let name = parse_option_name(stream)?;
    stream.expect(Token::Eq)?;
    let value = parse_constant(stream)?;
    stream.expect(Token::Semicolon)?;
    Ok((name, value))
}

/// Parse an option name: `foo.bar`, or the custom-option form
/// `(foo.bar).baz`, kept with its parentheses.
fn parse_option_name(stream: &mut TokenStream) -> Result<String, ParseError> {
    if matches!(stream.peek(), Some(Token::LParen)) {
        stream.advance();
        let inner = parse_dotted_name(stream)?;
        stream.expect(Token::RParen)?;
        let mut name = format!("({})", inner);
        while matches!(stream.peek(), Some(Token::Dot)) {
            stream.advance();
            name.push('.');
            name.push_str(&expect_name(stream)?);
        }
        Ok(name)
    } else {
        parse_dotted_name(stream)
    }
}

/// Parse `message Name { ... }`.
fn parse_message(stream: &mut TokenStream) -> Result<MessageNode, ParseError> {
    stream.expect(Token::Message)?;
    let name = expect_name(stream)?;
    stream.expect(Token::LBrace)?;

    let mut node = MessageNode {
        name,
        ..Default::default()
    };

    loop {
        match stream.peek() {
            Some(Token::RBrace) => {
                stream.advance();
                return Ok(node);
            }
            Some(Token::Semicolon) => {
                stream.advance();
            }
            Some(Token::Message) => node.messages.push(parse_message(stream)?),
            Some(Token::Enum) => node.enums.push(parse_enum(stream)?),
            Some(Token::Option) => {
                let (name, value) = parse_option(stream)?;
                node.options.insert(name, value);
            }
            Some(Token::Extensions) => parse_extensions(stream)?,
            Some(Token::Reserved) => parse_reserved(stream)?,
            Some(Token::Extend) => parse_extend(stream)?,
            Some(_) => node.fields.push(parse_field(stream)?),
            None => {
                return Err(ParseError::unexpected_token(
                    None,
                    "while parsing message body",
                    stream.current_span(),
                ))
            }
        }
    }
}

/// Parse a field declaration: `[rule] type name = tag [options];`.
///
/// A missing rule defaults to `optional` (proto3-style files omit it).
fn parse_field(stream: &mut TokenStream) -> Result<FieldNode, ParseError> {
    let rule = match stream.peek() {
        Some(Token::Required) => Some("required"),
        Some(Token::Optional) => Some("optional"),
        Some(Token::Repeated) => Some("repeated"),
        _ => None,
    };
    if rule.is_some() {
        stream.advance();
    }

    let ty = parse_type_reference(stream)?;
    let name = expect_name(stream)?;
    stream.expect(Token::Eq)?;
    let id = expect_field_tag(stream)?;

    let options = if matches!(stream.peek(), Some(Token::LBracket)) {
        parse_field_options(stream)?
    } else {
        IndexMap::new()
    };

    stream.expect(Token::Semicolon)?;

    Ok(FieldNode {
        rule: rule.unwrap_or("optional").to_string(),
        ty,
        name,
        id,
        options,
    })
}

/// Parse bracketed field options: `[default = -1, packed = true]`.
fn parse_field_options(
    stream: &mut TokenStream,
) -> Result<IndexMap<String, Constant>, ParseError> {
    stream.expect(Token::LBracket)?;
    let mut options = IndexMap::new();
    loop {
        let name = parse_option_name(stream)?;
        stream.expect(Token::Eq)?;
        let value = parse_constant(stream)?;
        options.insert(name, value);
        if matches!(stream.peek(), Some(Token::Comma)) {
            stream.advance();
            continue;
        }
        stream.expect(Token::RBracket)?;
        return Ok(options);
    }
}

/// Parse `enum Name { VALUE = n; ... }`.
fn parse_enum(stream: &mut TokenStream) -> Result<EnumNode, ParseError> {
    stream.expect(Token::Enum)?;
    let name = expect_name(stream)?;
    stream.expect(Token::LBrace)?;

    let mut node = EnumNode {
        name,
        ..Default::default()
    };

    loop {
        match stream.peek() {
            Some(Token::RBrace) => {
                stream.advance();
                return Ok(node);
            }
            Some(Token::Semicolon) => {
                stream.advance();
            }
            Some(Token::Option) => {
                let (name, value) = parse_option(stream)?;
                node.options.insert(name, value);
            }
            Some(_) => {
                let name = expect_name(stream)?;
                stream.expect(Token::Eq)?;
                let id = expect_enum_value(stream)?;
                stream.expect(Token::Semicolon)?;
                node.values.push(EnumValueNode { name, id });
            }
            None => {
                return Err(ParseError::unexpected_token(
                    None,
                    "while parsing enum body",
                    stream.current_span(),
                ))
            }
        }
    }
}

/// Consume `extensions` ranges up to the terminating semicolon.
fn parse_extensions(stream: &mut TokenStream) -> Result<(), ParseError> {
    stream.expect(Token::Extensions)?;
    skip_to_semicolon(stream, "while parsing 'extensions' ranges")
}

/// Consume a `reserved` statement up to the terminating semicolon.
fn parse_reserved(stream: &mut TokenStream) -> Result<(), ParseError> {
    stream.expect(Token::Reserved)?;
    skip_to_semicolon(stream, "while parsing 'reserved' statement")
}

/// Consume an `extend Type { ... }` block, tracking brace depth.
fn parse_extend(stream: &mut TokenStream) -> Result<(), ParseError> {
    stream.expect(Token::Extend)?;
    let _ = parse_type_reference(stream)?;
    stream.expect(Token::LBrace)?;
    let mut depth = 1usize;
    loop {
        match stream.peek() {
            Some(Token::LBrace) => {
                depth += 1;
                stream.advance();
            }
            Some(Token::RBrace) => {
                depth -= 1;
                stream.advance();
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(_) => {
                stream.advance();
            }
            None => {
                return Err(ParseError::unexpected_token(
                    None,
                    "while parsing extend block",
                    stream.current_span(),
                ))
            }
        }
    }
}

fn skip_to_semicolon(stream: &mut TokenStream, context: &str) -> Result<(), ParseError> {
    loop {
        match stream.peek() {
            Some(Token::Semicolon) => {
                stream.advance();
                return Ok(());
            }
            Some(_) => {
                stream.advance();
            }
            None => {
                return Err(ParseError::unexpected_token(
                    None,
                    context,
                    stream.current_span(),
                ))
            }
        }
    }
}

/// Parse a type reference: a dotted name with an optional leading dot
/// (fully-qualified form), kept verbatim.
fn parse_type_reference(stream: &mut TokenStream) -> Result<String, ParseError> {
    let mut ty = String::new();
    if matches!(stream.peek(), Some(Token::Dot)) {
        stream.advance();
        ty.push('.');
    }
    ty.push_str(&parse_dotted_name(stream)?);
    Ok(ty)
}

/// Parse a dot-separated name (`foo.bar.Baz`).
fn parse_dotted_name(stream: &mut TokenStream) -> Result<String, ParseError> {
    let mut name = expect_name(stream)?;
    while matches!(stream.peek(), Some(Token::Dot)) {
        stream.advance();
        name.push('.');
        name.push_str(&expect_name(stream)?);
    }
    Ok(name)
}

/// Expect an identifier, accepting keywords where the grammar position
/// requires a name (a field or message may legally be called `max` or
/// `package`).
fn expect_name(stream: &mut TokenStream) -> Result<String, ParseError> {
    let name = match stream.peek() {
        Some(Token::Ident(s)) => s.to_string(),
        Some(tok) if is_keyword(tok) => tok.to_string(),
        other => {
            return Err(ParseError::unexpected_token(
                other,
                "where a name is required",
                stream.current_span(),
            ))
        }
    };
    stream.advance();
    Ok(name)
}

/// Expect a string literal and return its unescaped content.
fn expect_string(stream: &mut TokenStream, context: &str) -> Result<String, ParseError> {
    let value = match stream.peek() {
        Some(Token::String(s)) => s.to_string(),
        other => {
            return Err(ParseError::unexpected_token(
                other,
                context,
                stream.current_span(),
            ))
        }
    };
    stream.advance();
    Ok(value)
}

/// Expect an unsigned 32-bit field tag.
fn expect_field_tag(stream: &mut TokenStream) -> Result<u32, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Int(i)) => {
            let i = *i;
            if !(0..=u32::MAX as i64).contains(&i) {
                return Err(ParseError::invalid_syntax(
                    format!("field tag {} is not an unsigned 32-bit integer", i),
                    span,
                ));
            }
            stream.advance();
            Ok(i as u32)
        }
        other => Err(ParseError::unexpected_token(
            other,
            "where a field tag is required",
            span,
        )),
    }
}

/// Expect a signed 32-bit enum value.
fn expect_enum_value(stream: &mut TokenStream) -> Result<i32, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Int(i)) => {
            let i = *i;
            if !(i32::MIN as i64..=i32::MAX as i64).contains(&i) {
                return Err(ParseError::invalid_syntax(
                    format!("enum value {} does not fit a signed 32-bit integer", i),
                    span,
                ));
            }
            stream.advance();
            Ok(i as i32)
        }
        other => Err(ParseError::unexpected_token(
            other,
            "where an enum value is required",
            span,
        )),
    }
}

/// Parse a constant: string, integer, float, boolean, or bare identifier
/// (enum-value defaults and the like, kept as a string).
fn parse_constant(stream: &mut TokenStream) -> Result<Constant, ParseError> {
    let value = match stream.peek() {
        Some(Token::String(s)) => Constant::String(s.to_string()),
        Some(Token::Int(i)) => Constant::Int(*i),
        Some(Token::Float(x)) => Constant::Float(*x),
        Some(Token::True) => Constant::Bool(true),
        Some(Token::False) => Constant::Bool(false),
        Some(Token::Ident(s)) => Constant::String(s.to_string()),
        other => {
            return Err(ParseError::unexpected_token(
                other,
                "where a constant is required",
                stream.current_span(),
            ))
        }
    };
    stream.advance();
    Ok(value)
}

/// Whether a token is a keyword that can double as an identifier.
fn is_keyword(token: &Token) -> bool {
    matches!(
        token,
        Token::Syntax
            | Token::Package
            | Token::Import
            | Token::Public
            | Token::Weak
            | Token::Option
            | Token::Message
            | Token::Enum
            | Token::Required
            | Token::Optional
            | Token::Repeated
            | Token::Extend
            | Token::Extensions
            | Token::Reserved
            | Token::To
            | Token::Max
    )
}
