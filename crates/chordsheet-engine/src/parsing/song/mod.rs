//! # Song assembly
//!
//! Phase 2 of chart parsing: classified lines become a [`SongDocument`] of
//! metadata directives and sections. Assembly is total; recoverable syntax
//! problems (stray environment closes, opaque chords, unterminated
//! brackets) become warnings on the document, never errors.

pub mod builder;
pub mod serialize;
pub mod types;

pub use builder::{SongBuilder, entry_for_line, env_directive, is_heading};
pub use serialize::serialize_document;
pub use types::{
    ContentLine, Directive, Entry, NodeId, ParseWarning, Section, SectionKind, SectionOrigin,
    SongDocument, WarningKind,
};
