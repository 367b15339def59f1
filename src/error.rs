use std::fmt;

use thiserror::Error;

/// Why an `i...e` body was rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IntegerFault {
    Empty,
    NotANumber,
    LeadingZero,
    NegativeZero,
    Overflow,
    Unterminated,
}

impl fmt::Display for IntegerFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegerFault::Empty => write!(f, "empty integer body"),
            IntegerFault::NotANumber => write!(f, "body is not a decimal number"),
            IntegerFault::LeadingZero => write!(f, "leading zeros are not allowed"),
            IntegerFault::NegativeZero => write!(f, "negative zero is not allowed. Use 0 instead"),
            IntegerFault::Overflow => write!(f, "value does not fit in a signed 64-bit integer"),
            IntegerFault::Unterminated => write!(f, "missing terminating 'e'"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CollectionKind {
    List,
    Dictionary,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "list"),
            CollectionKind::Dictionary => write!(f, "dictionary"),
        }
    }
}

/// Failure while decoding. Offsets are absolute positions in the input
/// where the failing element begins.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed byte string length at offset {offset}")]
    MalformedLength { offset: usize },

    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEndOfInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid integer at offset {offset}: {fault}")]
    InvalidInteger { offset: usize, fault: IntegerFault },

    #[error("unterminated {kind} starting at offset {offset}")]
    UnterminatedCollection { kind: CollectionKind, offset: usize },

    #[error("dictionary key at offset {offset} without value")]
    KeyWithoutValue { offset: usize },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    #[error("trailing data after value at offset {offset}")]
    TrailingData { offset: usize },
}

/// Fieldless view of [`DecodeError`], for matching on the category alone.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DecodeErrorKind {
    MalformedLength,
    UnexpectedEndOfInput,
    InvalidInteger,
    UnterminatedCollection,
    KeyWithoutValue,
    NestingTooDeep,
    TrailingData,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MalformedLength { .. } => DecodeErrorKind::MalformedLength,
            DecodeError::UnexpectedEndOfInput { .. } => DecodeErrorKind::UnexpectedEndOfInput,
            DecodeError::InvalidInteger { .. } => DecodeErrorKind::InvalidInteger,
            DecodeError::UnterminatedCollection { .. } => DecodeErrorKind::UnterminatedCollection,
            DecodeError::KeyWithoutValue { .. } => DecodeErrorKind::KeyWithoutValue,
            DecodeError::NestingTooDeep { .. } => DecodeErrorKind::NestingTooDeep,
            DecodeError::TrailingData { .. } => DecodeErrorKind::TrailingData,
        }
    }

    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::MalformedLength { offset }
            | DecodeError::UnexpectedEndOfInput { offset, .. }
            | DecodeError::InvalidInteger { offset, .. }
            | DecodeError::UnterminatedCollection { offset, .. }
            | DecodeError::KeyWithoutValue { offset }
            | DecodeError::NestingTooDeep { offset, .. }
            | DecodeError::TrailingData { offset } => offset,
        }
    }
}

/// Failure on the dynamic encode path. The typed path cannot fail.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EncodeError {
    /// `path` locates the offending element: `$` is the input itself,
    /// `$[2]` the third list item, `$[0].key` the first mapping key.
    #[error("unsupported bencode type at {path}")]
    UnsupportedType { path: String },
}
