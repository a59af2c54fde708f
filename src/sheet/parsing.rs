//! Re-entrant parsing of generated dictionary bodies
//!
//! Object-iterator expansion hands each permutation's re-tokenized body to a
//! [`RouteParser`]. The trait is the seam to the outer document model — a
//! host can route generated bodies through its own rule parser — while
//! [`BodyParser`] is the built-in implementation for the generated-body
//! grammar:
//!
//! ```text
//! body    := '{' entry* '}'
//! entry   := key '=' value (',' value)* ';'
//!          | key body
//!          | instruction ';'
//! key     := text-or-string selector?
//! ```
//!
//! Comma-separated values become a `Collection` of `Scalar`s, `@...` tokens
//! become `Instruction`s, quoted strings are unquoted. Macro placeholders the
//! items-only pass left behind stay in the scalar text and resolve on the
//! next read against a full context.

use crate::sheet::error::{ExpandError, ExpandResult};
use crate::sheet::lexing::{Token, TokenKind};
use crate::sheet::location::SourceLocation;
use crate::sheet::route::Route;
use crate::sheet::value::{Collection, Instruction, Scalar, Value};

/// Callback capability for parsing a generated token stream into routes
/// under a namespace root.
pub trait RouteParser {
    fn parse_routes(&mut self, tokens: &[Token], namespace: &str) -> ExpandResult<Vec<Route>>;
}

/// The built-in parser for generated dictionary bodies.
#[derive(Debug, Default)]
pub struct BodyParser;

impl BodyParser {
    pub fn new() -> Self {
        Self
    }
}

impl RouteParser for BodyParser {
    fn parse_routes(&mut self, tokens: &[Token], namespace: &str) -> ExpandResult<Vec<Route>> {
        let mut cursor = Cursor::new(tokens);
        let mut routes = Vec::new();
        let path = vec![namespace.to_string()];

        cursor.skip_trivia();
        parse_body(&mut cursor, &path, &mut routes)?;
        cursor.skip_trivia();
        if let Some(extra) = cursor.peek() {
            return Err(unexpected("unexpected tokens after object body", extra));
        }
        Ok(routes)
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn skip_trivia(&mut self) {
        while self.peek().is_some_and(Token::is_trivia) {
            self.index += 1;
        }
    }

    fn last_location(&self) -> SourceLocation {
        self.tokens
            .last()
            .map(|t| t.location.clone())
            .unwrap_or_else(SourceLocation::unknown)
    }
}

fn unexpected(message: &str, token: &Token) -> Box<ExpandError> {
    Box::new(ExpandError::Parse {
        message: message.to_string(),
        text: token.text.clone(),
        location: token.location.clone(),
    })
}

fn truncated(message: &str, cursor: &Cursor) -> Box<ExpandError> {
    Box::new(ExpandError::Parse {
        message: message.to_string(),
        text: String::new(),
        location: cursor.last_location(),
    })
}

/// Parse `{ entry* }` with the cursor on the open brace, emitting one route
/// per leaf entry with `path` extended by the entry keys.
fn parse_body(cursor: &mut Cursor, path: &[String], routes: &mut Vec<Route>) -> ExpandResult<()> {
    match cursor.advance() {
        Some(token) if token.kind == TokenKind::OpenBrace => {}
        Some(token) => return Err(unexpected("expected '{' to open object body", token)),
        None => return Err(truncated("expected '{' to open object body", cursor)),
    }

    loop {
        cursor.skip_trivia();
        let token = match cursor.peek() {
            Some(token) => token,
            None => return Err(truncated("object body is missing its closing '}'", cursor)),
        };

        match token.kind {
            TokenKind::CloseBrace => {
                cursor.advance();
                return Ok(());
            }
            TokenKind::EmbeddedInstruction => {
                let token = token.clone();
                cursor.advance();
                cursor.skip_trivia();
                match cursor.advance() {
                    Some(t) if t.kind == TokenKind::Semicolon => {}
                    Some(t) => return Err(unexpected("expected ';' after instruction", t)),
                    None => return Err(truncated("expected ';' after instruction", cursor)),
                }
                let keyword = token
                    .text
                    .split_whitespace()
                    .next()
                    .unwrap_or(token.text.as_str())
                    .to_string();
                let mut entry_path = path.to_vec();
                entry_path.push(keyword);
                routes.push(Route::new(
                    entry_path,
                    Value::Instruction(Instruction::new(token.text.clone(), token.location)),
                ));
            }
            TokenKind::Text | TokenKind::StringLiteral => {
                parse_entry(cursor, path, routes)?;
            }
            _ => return Err(unexpected("expected a key, instruction, or '}'", token)),
        }
    }
}

/// Parse one `key = value;` or `key { ... }` entry, cursor on the key token.
fn parse_entry(cursor: &mut Cursor, path: &[String], routes: &mut Vec<Route>) -> ExpandResult<()> {
    let key_token = match cursor.advance() {
        Some(token) => token,
        None => return Err(truncated("expected a key", cursor)),
    };
    let mut key = match key_token.kind {
        TokenKind::StringLiteral => unquote(&key_token.text),
        _ => key_token.text.clone(),
    };

    // a selector sticks to the key it follows: `key[x64] = ...`
    if cursor.peek().map(|t| t.kind) == Some(TokenKind::SelectorParameter) {
        if let Some(selector) = cursor.advance() {
            key.push_str(&selector.text);
        }
    }

    let mut entry_path = path.to_vec();
    entry_path.push(key);

    cursor.skip_trivia();
    match cursor.peek() {
        Some(token) if token.kind == TokenKind::Equals => {
            cursor.advance();
            let value = parse_value(cursor)?;
            routes.push(Route::new(entry_path, value));
            Ok(())
        }
        Some(token) if token.kind == TokenKind::OpenBrace => {
            parse_body(cursor, &entry_path, routes)
        }
        Some(token) => Err(unexpected("expected '=' or '{' after key", token)),
        None => Err(truncated("expected '=' or '{' after key", cursor)),
    }
}

/// Parse the right-hand side of `key =` up to the terminating semicolon.
fn parse_value(cursor: &mut Cursor) -> ExpandResult<Value> {
    let mut parts: Vec<Vec<&Token>> = vec![Vec::new()];

    loop {
        let token = match cursor.advance() {
            Some(token) => token,
            None => return Err(truncated("value is missing its terminating ';'", cursor)),
        };
        match token.kind {
            TokenKind::Semicolon => break,
            TokenKind::Comma => parts.push(Vec::new()),
            TokenKind::CloseBrace | TokenKind::OpenBrace => {
                return Err(unexpected("expected ';' before end of object body", token))
            }
            _ => {
                if let Some(part) = parts.last_mut() {
                    part.push(token);
                }
            }
        }
    }

    let mut values: Vec<Value> = parts.iter().map(|part| part_value(part)).collect();
    if values.len() == 1 {
        return Ok(values.remove(0));
    }
    let location = values
        .first()
        .and_then(|v| v.source_locations().into_iter().next())
        .unwrap_or_else(SourceLocation::unknown);
    Ok(Value::Collection(Collection::from_values(values, location)))
}

/// Build the value for one comma-separated part.
fn part_value(part: &[&Token]) -> Value {
    let meaningful: Vec<&&Token> = part.iter().filter(|t| !t.is_trivia()).collect();

    if let [only] = meaningful.as_slice() {
        match only.kind {
            TokenKind::StringLiteral => {
                return Value::Scalar(Scalar::new(unquote(&only.text), only.location.clone()));
            }
            TokenKind::EmbeddedInstruction => {
                return Value::Instruction(Instruction::new(
                    only.text.clone(),
                    only.location.clone(),
                ));
            }
            _ => {}
        }
    }

    let location = meaningful
        .first()
        .map(|t| t.location.clone())
        .unwrap_or_else(SourceLocation::unknown);
    let text: String = part.iter().map(|t| t.text.as_str()).collect();
    Value::Scalar(Scalar::new(text, location))
}

/// Strip surrounding quotes and unescape `\"` and `\\`.
fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::lexing::tokenize;

    fn routes_of(source: &str) -> Vec<Route> {
        let tokens = tokenize(source, None).expect("tokenizes");
        BodyParser::new()
            .parse_routes(&tokens, "ns#0#")
            .expect("parses")
    }

    fn parse_err(source: &str) -> ExpandError {
        let tokens = tokenize(source, None).expect("tokenizes");
        *BodyParser::new()
            .parse_routes(&tokens, "ns#0#")
            .expect_err("should fail")
    }

    #[test]
    fn test_single_entry() {
        let routes = routes_of("{ arch = x64; }");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].key(), "ns#0#.arch");
        assert!(matches!(routes[0].value(), Value::Scalar(s) if s.text() == "x64"));
    }

    #[test]
    fn test_comma_value_becomes_collection() {
        let routes = routes_of("{ flags = a, b, c; }");
        match routes[0].value() {
            Value::Collection(c) => assert_eq!(c.len(), 3),
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_body_extends_path() {
        let routes = routes_of("{ compile { flags = fast; } }");
        assert_eq!(routes[0].key(), "ns#0#.compile.flags");
    }

    #[test]
    fn test_quoted_key_and_value() {
        let routes = routes_of(r#"{ "my key" = "a \"b\" c"; }"#);
        assert_eq!(routes[0].key(), "ns#0#.my key");
        assert!(matches!(routes[0].value(), Value::Scalar(s) if s.text() == r#"a "b" c"#));
    }

    #[test]
    fn test_selector_sticks_to_key() {
        let routes = routes_of("{ lib[x64,release] = a.lib; }");
        assert_eq!(routes[0].key(), "ns#0#.lib[x64,release]");
    }

    #[test]
    fn test_instruction_entry() {
        let routes = routes_of("{ @import common; }");
        assert_eq!(routes[0].key(), "ns#0#.@import");
        assert!(matches!(routes[0].value(), Value::Instruction(i) if i.text() == "@import common"));
    }

    #[test]
    fn test_instruction_value() {
        let routes = routes_of("{ step = @run tool; }");
        assert!(matches!(routes[0].value(), Value::Instruction(i) if i.text() == "@run tool"));
    }

    #[test]
    fn test_macro_placeholder_survives_in_scalar() {
        let routes = routes_of("{ v = ${version}; }");
        assert!(matches!(routes[0].value(), Value::Scalar(s) if s.text() == "${version}"));
    }

    #[test]
    fn test_multi_token_value_preserves_inner_spacing() {
        let routes = routes_of("{ cmd = run the tool; }");
        assert!(matches!(routes[0].value(), Value::Scalar(s) if s.text() == "run the tool"));
    }

    #[test]
    fn test_missing_close_brace() {
        let err = parse_err("{ a = b;");
        assert!(matches!(err, ExpandError::Parse { ref message, .. }
            if message.contains("closing '}'")));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_err("{ a = b }");
        assert!(matches!(err, ExpandError::Parse { ref message, .. }
            if message.contains("';'")));
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_err("{ a b; }");
        assert!(matches!(err, ExpandError::Parse { ref message, .. }
            if message.contains("'=' or '{'")));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_err("{ a = b; } junk");
        assert!(matches!(err, ExpandError::Parse { ref message, .. }
            if message.contains("after object body")));
    }

    #[test]
    fn test_error_carries_location() {
        let err = parse_err("{ a ! b; }");
        match err {
            ExpandError::Parse { location, .. } => assert_eq!(location.row, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
