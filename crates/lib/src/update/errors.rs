//! Error types for update decoding.

use thiserror::Error;

/// Structured errors raised while reading a Yjs v1 update.
///
/// Offsets are byte positions in the update buffer where the failing read
/// started.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended in the middle of a value
    #[error("Unexpected end of update at byte {offset}")]
    UnexpectedEof { offset: usize },

    /// A variable-length integer does not fit its target type
    #[error("Variable-length integer overflow at byte {offset}")]
    VarIntOverflow { offset: usize },

    /// A string is not valid UTF-8
    #[error("Invalid UTF-8 string at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// Struct info byte names an unknown content kind
    #[error("Unknown content ref {tag} at byte {offset}")]
    UnknownContentRef { tag: u8, offset: usize },

    /// Unknown type tag inside a lib0 "any" value
    #[error("Unknown any tag {tag} at byte {offset}")]
    UnknownAnyTag { tag: u8, offset: usize },

    /// Unknown shared type kind inside a type content
    #[error("Unknown type ref {type_ref} at byte {offset}")]
    UnknownTypeRef { type_ref: u64, offset: usize },

    /// Embedded JSON text could not be parsed
    #[error("Invalid JSON in update: {reason}")]
    InvalidJson { reason: String },

    /// Clock of a client exceeds the supported range
    #[error("Clock overflow for client {client}")]
    ClockOverflow { client: u64 },
}

impl DecodeError {
    /// Check if the update was cut short
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::UnexpectedEof { .. })
    }

    /// Check if the update contains a value this decoder does not know
    pub fn is_unknown_tag(&self) -> bool {
        matches!(
            self,
            DecodeError::UnknownContentRef { .. }
                | DecodeError::UnknownAnyTag { .. }
                | DecodeError::UnknownTypeRef { .. }
        )
    }

    /// Byte offset of the failing read, if known
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedEof { offset }
            | DecodeError::VarIntOverflow { offset }
            | DecodeError::InvalidUtf8 { offset }
            | DecodeError::UnknownContentRef { offset, .. }
            | DecodeError::UnknownAnyTag { offset, .. }
            | DecodeError::UnknownTypeRef { offset, .. } => Some(*offset),
            DecodeError::InvalidJson { .. } | DecodeError::ClockOverflow { .. } => None,
        }
    }
}

// Conversion from DecodeError to the main Error type
impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        crate::Error::Decode(err)
    }
}
