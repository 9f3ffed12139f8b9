use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into a model
"#]
#[derive(Debug, Error)]
#[error("reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("parsing: {0}")]
    Parse(#[from] ParseError),
    /// Reading out of bounds.
    #[error("read out of bounds")]
    OutOfBounds,
    /// Variable-length quantity longer than four encoded bytes.
    #[error("variable-length MIDI number > 4 bytes")]
    VarIntTooLong,
    /// A text payload or symbol that is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidString,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new parse error
    pub const fn parse(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Parse(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }

    /// True if the input ended before the read completed
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The read result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
