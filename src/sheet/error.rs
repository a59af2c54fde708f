//! Error types for template expansion and re-entrant parsing

use crate::sheet::location::SourceLocation;
use std::fmt;

/// Errors that can occur while expanding iterator templates.
///
/// Axis-resolution fallbacks and empty cartesian products are not errors;
/// the only fatal conditions are generated text that cannot be re-tokenized
/// and generated object bodies that cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandError {
    /// Resolved template text contained a region the lexer cannot tokenize
    Retokenize {
        text: String,
        location: SourceLocation,
    },
    /// A generated object body is not a valid dictionary body
    Parse {
        message: String,
        text: String,
        location: SourceLocation,
    },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::Retokenize { text, location } => {
                write!(
                    f,
                    "Unrecognized text {:?} at {} while re-tokenizing generated output",
                    text, location
                )
            }
            ExpandError::Parse {
                message,
                text,
                location,
            } => {
                write!(f, "Parse error at {}: {} (near {:?})", location, message, text)
            }
        }
    }
}

impl std::error::Error for ExpandError {}

/// Type alias for expansion results with boxed errors (reduces stack size)
pub type ExpandResult<T> = Result<T, Box<ExpandError>>;
