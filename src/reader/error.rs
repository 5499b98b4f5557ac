use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A decoding failure, pinned to the byte offset at which it occurred.
"#]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("reading at byte {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The byte source ran out in the middle of a read.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,
    /// The bytes were present but did not parse.
    #[error("parsing {0}")]
    Parse(#[from] ParseError),
}

impl ReaderError {
    /// Create a reader error from a position and kind.
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create an end-of-stream error at the given position.
    pub const fn end_of_stream(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::UnexpectedEndOfStream,
        }
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, error: impl Into<ParseError>) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Parse(error.into()),
        }
    }

    /// True if the byte source was exhausted mid-read.
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::UnexpectedEndOfStream)
    }

    /// Returns the error kind.
    pub const fn kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the byte offset where the read failed.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Reinterpret an end-of-stream failure as the given parse error,
    /// keeping any other kind as-is.
    ///
    /// Running out of a track chunk's payload means the events overran
    /// the declared length, not that the file ended.
    pub(crate) fn end_of_stream_as(self, error: impl Into<ParseError>) -> Self {
        match self.kind {
            ReaderErrorKind::UnexpectedEndOfStream => Self::parse(self.position, error),
            _ => self,
        }
    }
}

/// The read result type (see [`ReaderError`]).
pub type ReadResult<T> = Result<T, ReaderError>;
