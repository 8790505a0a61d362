//! # Chord model
//!
//! Pitch classes, keys, and chord symbols as written in chart notation.
//!
//! Chord text is parsed against fixed, explicitly enumerated grammar tables
//! (longest symbol first, so `maj7` never splits into `m` + `aj7`). Anything
//! the tables cannot account for stays an [`ChordSymbol::Opaque`] token:
//! chord parsing never fails, and opaque text survives verbatim through
//! rendering and transposition.

pub mod chord;
pub mod pitch;

pub use chord::{ChordSymbol, ChordToken, Quality, parse_chord};
pub use pitch::{Key, PitchClass};
