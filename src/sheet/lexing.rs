//! Token definitions and the two tokenization passes
//!
//! Tokens are defined with the logos derive macro. The same lexer runs twice:
//! once over surface documents, and again over the text generated when an
//! object-iterator template is resolved for one permutation ("re-entrant"
//! tokenization). The grammar is deliberately lenient for the first pass —
//! stray `$`, `@` and brackets degrade to plain text — but an unterminated
//! string literal or other unmatched region is a hard [`ExpandError::Retokenize`],
//! which on the second pass signals a template that resolved to garbage.
//!
//! [`detokenize`] is the exact inverse of [`tokenize`]: whitespace and
//! newlines are real tokens carrying their raw text, so a token stream can be
//! flattened back to the string it came from. Template resolution relies on
//! this round trip.

use crate::sheet::error::{ExpandError, ExpandResult};
use crate::sheet::location::{LineIndex, SourceLocation};
use logos::Logos;
use serde::Serialize;

/// All token kinds the expansion core consumes or re-emits.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("=")]
    Equals,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    /// Legacy template slot; the n-th slot binds to axis n's current value
    #[token("?")]
    TemplateSlot,

    /// `[...]` selector attached to a key
    #[regex(r"\[[^\[\]\n]*\]")]
    SelectorParameter,

    /// `@directive ...` up to the terminating semicolon or end of line
    #[regex(r"@[A-Za-z_][^;\n]*")]
    EmbeddedInstruction,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,

    /// `${name}` or the deferred `${#name}` escape
    #[regex(r"\$\{[^${}\n]*\}")]
    Macro,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    // Stray `$`, `@`, `[`, `]` that start no larger token degrade to text
    #[regex(r#"[^ \t\r\n{}=;,?\[\]"$@]+"#)]
    #[token("$")]
    #[token("@")]
    #[token("[")]
    #[token("]")]
    Text,
}

impl TokenKind {
    /// Whitespace and newlines: preserved for round trips, skipped by parsers
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// One lexed token: kind, the raw text it covered, and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// A token fabricated during expansion, with no source provenance.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, SourceLocation::unknown())
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

/// Tokenize a source string, attributing locations to `file`.
///
/// An unmatched region produces a [`ExpandError::Retokenize`] carrying the
/// offending text and its location.
pub fn tokenize(source: &str, file: Option<&str>) -> ExpandResult<Vec<Token>> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let location = index.location(lexer.span().start, file);
        match result {
            Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), location)),
            Err(()) => {
                return Err(Box::new(ExpandError::Retokenize {
                    text: lexer.slice().to_string(),
                    location,
                }))
            }
        }
    }

    Ok(tokens)
}

/// Flatten a token stream back to the string it was lexed from.
pub fn detokenize(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
