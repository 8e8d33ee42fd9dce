//! Item key parse errors.
//!
//! Every failure carries the offending character (where there is one), its
//! 1-based character position for messages, and a byte [`Span`] for
//! source-annotated rendering.

use std::collections::BTreeMap;

use serde::Serialize;

use super::diag::{Diagnostic, Span, codes};

/// Broad classification of a key error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input has zero length.
    EmptyKey,
    /// The input exceeds the length limit.
    KeyTooLong,
    /// Malformed bracket/quote structure.
    SyntaxError,
    /// Structurally unrecognized key or parameter list.
    InvalidFormat,
}

/// Reason a key was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The input has zero length.
    #[error("key cannot be empty")]
    Empty,

    /// The input is longer than the configured limit.
    #[error("key is too long: {length} characters, maximum is {max}")]
    TooLong {
        /// Length of the input in characters.
        length: usize,
        /// Configured maximum length in characters.
        max: usize,
        /// Bytes past the limit.
        span: Span,
    },

    /// A character that cannot start a parameter list follows the identifier,
    /// or the identifier is missing.
    #[error("invalid item key format: unexpected \"{ch}\" at position {position}")]
    InvalidFormat {
        /// The offending character.
        ch: char,
        /// 1-based character position.
        position: usize,
        /// Byte span of the character.
        span: Span,
    },

    /// The input ended inside the parameter list.
    #[error("invalid item key format: parameter list is not terminated")]
    Unterminated {
        /// From the opening `[` to the end of input.
        span: Span,
    },

    /// Something follows the final closing bracket.
    #[error("unexpected character \"{ch}\" at position {position} after closing bracket")]
    TrailingCharacter {
        /// The offending character.
        ch: char,
        /// 1-based character position.
        position: usize,
        /// Byte span of the character.
        span: Span,
    },

    /// A closing quote or nested group is followed by something other than
    /// `,` or `]`.
    #[error("incorrect syntax near \"{ch}\" at position {position}")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// 1-based character position.
        position: usize,
        /// Byte span of the character.
        span: Span,
    },
}

impl KeyError {
    /// Taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyError::Empty => ErrorKind::EmptyKey,
            KeyError::TooLong { .. } => ErrorKind::KeyTooLong,
            KeyError::InvalidFormat { .. } | KeyError::Unterminated { .. } => {
                ErrorKind::InvalidFormat
            }
            KeyError::TrailingCharacter { .. } | KeyError::UnexpectedCharacter { .. } => {
                ErrorKind::SyntaxError
            }
        }
    }

    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            KeyError::Empty => codes::EMPTY_KEY,
            KeyError::TooLong { .. } => codes::KEY_TOO_LONG,
            KeyError::InvalidFormat { .. } => codes::INVALID_FORMAT,
            KeyError::Unterminated { .. } => codes::UNTERMINATED_PARAMETERS,
            KeyError::TrailingCharacter { .. } => codes::TRAILING_CHARACTER,
            KeyError::UnexpectedCharacter { .. } => codes::UNEXPECTED_CHARACTER,
        }
    }

    /// Byte span the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            KeyError::Empty => None,
            KeyError::TooLong { span, .. }
            | KeyError::InvalidFormat { span, .. }
            | KeyError::Unterminated { span }
            | KeyError::TrailingCharacter { span, .. }
            | KeyError::UnexpectedCharacter { span, .. } => Some(*span),
        }
    }

    /// 1-based character position of the offending character, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            KeyError::InvalidFormat { position, .. }
            | KeyError::TrailingCharacter { position, .. }
            | KeyError::UnexpectedCharacter { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Convert into a [`Diagnostic`] carrying code, message, span and context.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        let ctx: BTreeMap<String, String> = match self {
            KeyError::Empty => return diag,
            KeyError::TooLong { length, max, .. } => BTreeMap::from([
                ("length".into(), length.to_string()),
                ("max".into(), max.to_string()),
            ]),
            KeyError::Unterminated { .. } => BTreeMap::from([("expected".into(), "]".into())]),
            KeyError::InvalidFormat { ch, position, .. }
            | KeyError::TrailingCharacter { ch, position, .. }
            | KeyError::UnexpectedCharacter { ch, position, .. } => BTreeMap::from([
                ("char".into(), ch.to_string()),
                ("position".into(), position.to_string()),
            ]),
        };
        diag.with_context(ctx)
    }
}
