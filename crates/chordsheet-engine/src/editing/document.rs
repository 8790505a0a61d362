use xi_rope::Rope;
use xi_rope::delta::Transformer;

use crate::error::EngineError;
use crate::parsing::parse_document;
use crate::parsing::song::SongDocument;
use crate::render::{PreviewTree, preview_rows};
use crate::suggest::{Suggestion, suggest};
use crate::transpose::transpose_document;

use super::commands::Cmd;
use super::patch::Patch;
use super::reparse::reparse;

/// The editing model for one open chart.
///
/// The xi-rope buffer is the single source of truth; the parsed
/// [`SongDocument`] is derived state, kept in sync incrementally as
/// commands are applied. Hosts own all lifecycle around this type — the
/// engine never persists, never spawns threads, and orders results purely
/// by the version counter: artifacts derived from an older version are
/// stale and must be discarded, never merged over newer ones.
pub struct Document {
    buffer: Rope,
    song: SongDocument,
    selection: std::ops::Range<usize>,
    version: u64,
}

impl Document {
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let song = parse_document(&buffer);
        let len = buffer.len();
        Self {
            buffer,
            song,
            selection: len..len,
            version: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let text = std::str::from_utf8(bytes).map_err(|_| EngineError::InvalidUtf8)?;
        Ok(Self::new(text))
    }

    /// Applies one edit: compile to a delta, update the buffer, reparse
    /// incrementally, transform the selection, bump the version.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EngineError> {
        cmd.validate(&self.buffer)?;
        let delta = cmd.compile(&self.buffer);
        let old_range = cmd.old_range();

        let new_buffer = delta.apply(&self.buffer);
        let song = reparse(&self.song, &self.buffer, &new_buffer, old_range.clone());

        let mut transformer = Transformer::new(&delta);
        let new_selection = transformer.transform(self.selection.start, true)
            ..transformer.transform(self.selection.end, true);

        self.buffer = new_buffer;
        self.song = song;
        self.selection = new_selection.clone();
        self.version += 1;

        Ok(Patch {
            changed: vec![old_range.start..old_range.start + cmd.inserted_len()],
            new_selection,
            version: self.version,
        })
    }

    /// The parsed document. Position spans address the current buffer.
    pub fn song(&self) -> &SongDocument {
        &self.song
    }

    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    /// Current buffer content. This is exactly what a host should hand to
    /// its persistence layer.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) -> Result<(), EngineError> {
        let len = self.buffer.len();
        if selection.start > selection.end || selection.end > len {
            return Err(EngineError::RangeOutOfBounds {
                start: selection.start,
                end: selection.end,
                len,
            });
        }
        self.selection = selection;
        Ok(())
    }

    /// Layout-ready preview of the current parse, tagged with the version
    /// it was derived from.
    pub fn preview(&self) -> PreviewTree {
        PreviewTree {
            version: self.version,
            rows: preview_rows(&self.song),
        }
    }

    /// Chord completions for a cursor sitting inside an open `[` context.
    pub fn suggestions(&self, cursor: usize) -> Result<Vec<Suggestion>, EngineError> {
        suggest(&self.song, &self.buffer, cursor)
    }

    /// Transposed copy of the parsed document plus its canonical text.
    /// This document is untouched; feeding the text back through a host
    /// edit (or a fresh `Document`) keeps undo simple on the host side.
    pub fn transpose(&self, semitones: i32, prefer_sharps: Option<bool>) -> (SongDocument, String) {
        transpose_document(&self.song, semitones, prefer_sharps)
    }
}
