use crate::common::config::{Diagnostic, ToDiagnostic};
use thiserror::Error;

/// A malformed serialized compilation unit.
///
/// Decoding never recovers from one of these: the whole decode is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte offset {offset})")]
pub struct DecodeError {
    /// Position of the field that failed to decode.
    pub offset: usize,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of input: needed {needed} bytes but only {available} remain")]
    UnexpectedEnd { needed: usize, available: usize },
    #[error("invalid {what} tag {tag}")]
    InvalidTag { what: &'static str, tag: u8 },
    #[error("string content is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0:#x} is not a unicode scalar value")]
    InvalidChar(u32),
    #[error("negative length {0}")]
    NegativeLength(i32),
    #[error("length {len} exceeds the limit of {limit}")]
    LengthTooLarge { len: usize, limit: usize },
    #[error("types are nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("{0} trailing bytes after the architecture tag")]
    TrailingBytes(usize),
}

impl DecodeError {
    #[must_use]
    pub fn new(offset: usize, kind: DecodeErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl ToDiagnostic for DecodeError {
    fn to_diagnostic(&self) -> Diagnostic {
        let note = match self.kind {
            DecodeErrorKind::UnexpectedEnd { .. } | DecodeErrorKind::TrailingBytes(_) => {
                "the input was truncated or produced by a different serializer revision"
            }
            DecodeErrorKind::NestingTooDeep { .. } | DecodeErrorKind::LengthTooLarge { .. } => {
                "the limit can be raised through `DecodeConfig`"
            }
            _ => "the serialized compilation unit is malformed",
        };
        Diagnostic::error()
            .with_message(format!("failed to decode compilation info: {}", self.kind))
            .with_notes(vec![format!("at byte offset {}", self.offset), note.to_string()])
    }
}
