use thiserror::Error;

/// Host contract violations — the only conditions surfaced to callers as
/// failures. Syntax problems never appear here; they are warnings on the
/// parsed document, and parsing itself is total.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("cursor offset {offset} is outside the buffer (length {len})")]
    CursorOutOfBounds { offset: usize, len: usize },

    #[error("edit range {start}..{end} is outside the buffer (length {len})")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("buffer is not valid UTF-8")]
    InvalidUtf8,
}
