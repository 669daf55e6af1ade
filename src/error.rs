/*!
Error types for decoding and encoding.

Errors are fail-fast: the first violation aborts the whole call and carries
the byte offset where it was detected. Callers that want line/column
positions can derive them by scanning the input up to the offset.
*/

use std::borrow::Cow;

use thiserror::Error;

/**
An error produced while decoding or encoding a JSON value.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
}

/**
The category of a decode or encode failure.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("{0}")]
    MalformedInput(Cow<'static, str>),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("{0}")]
    InvalidNumberShape(Cow<'static, str>),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("NaN and Infinity have no JSON representation")]
    NonFiniteFloat,
    #[error("allocation failure")]
    AllocationFailure,
}

impl Error {
    #[cold]
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Error { kind, offset }
    }

    /**
    The category of the failure.
    */
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /**
    The byte offset into the input where the failure was detected.

    Always `0` for failures that aren't tied to an input position, like
    allocation failures during value construction.
    */
    pub fn offset(&self) -> usize {
        self.offset
    }
}
