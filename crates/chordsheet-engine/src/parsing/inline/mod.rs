//! # Content-line segment scanning
//!
//! Splits a content line into `[chord]lyric` segments, left to right. Text
//! before the first bracket becomes a leading unanchored segment; an
//! unterminated `[` is literal lyric text from the bracket onward, never an
//! error. Concatenating the lyric of every segment reproduces the line's
//! lyric text exactly.

pub mod cursor;
pub mod parser;

pub use parser::{ScanOutcome, Segment, scan_segments};
