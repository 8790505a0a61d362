pub mod editing;
pub mod error;
pub mod io;
pub mod models;
pub mod music;
pub mod parsing;
pub mod render;
pub mod suggest;
pub mod transpose;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, Patch};
pub use error::EngineError;
pub use models::ChartFile;
pub use music::{ChordSymbol, ChordToken, Key, PitchClass, Quality, parse_chord};
pub use parsing::song::{
    ContentLine, Directive, Entry, NodeId, ParseWarning, Section, SectionKind, SectionOrigin,
    SongDocument, WarningKind, serialize_document,
};
pub use parsing::{parse_document, parse_str};
pub use render::{PositionedChord, PreviewRow, PreviewTree};
pub use suggest::{MAX_SUGGESTIONS, Suggestion, suggest};
pub use transpose::transpose_document;
