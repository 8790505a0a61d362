use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::error::EngineError;

/// Edits a host can apply to a document. All buffer mutation flows through
/// here; commands compile to xi-rope deltas.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
}

impl Cmd {
    /// The byte range this command rewrites, in pre-edit coordinates.
    pub(crate) fn old_range(&self) -> std::ops::Range<usize> {
        match self {
            Cmd::InsertText { at, .. } => *at..*at,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => range.clone(),
        }
    }

    /// Length of the text the command puts in place of [`Cmd::old_range`].
    pub(crate) fn inserted_len(&self) -> usize {
        match self {
            Cmd::InsertText { text, .. } | Cmd::ReplaceRange { text, .. } => text.len(),
            Cmd::DeleteRange { .. } => 0,
        }
    }

    /// Rejects commands addressing bytes outside the buffer. These are host
    /// contract violations, the only failures the engine surfaces.
    pub(crate) fn validate(&self, buffer: &Rope) -> Result<(), EngineError> {
        let len = buffer.len();
        match self {
            Cmd::InsertText { at, .. } => {
                if *at > len {
                    return Err(EngineError::CursorOutOfBounds { offset: *at, len });
                }
            }
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => {
                if range.start > range.end || range.end > len {
                    return Err(EngineError::RangeOutOfBounds {
                        start: range.start,
                        end: range.end,
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn compile(&self, buffer: &Rope) -> Delta<RopeInfo> {
        let mut builder = Builder::new(buffer.len());
        match self {
            Cmd::InsertText { at, text } => {
                builder.replace(*at..*at, Rope::from(text.as_str()));
            }
            Cmd::DeleteRange { range } => {
                builder.delete(range.clone());
            }
            Cmd::ReplaceRange { range, text } => {
                builder.replace(range.clone(), Rope::from(text.as_str()));
            }
        }
        builder.build()
    }
}
