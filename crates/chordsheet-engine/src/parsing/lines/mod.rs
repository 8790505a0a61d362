//! # Line classification
//!
//! Phase 1 of chart parsing: every raw line is classified independently into
//! a [`LineKind`], using only facts local to that line. The priority order
//! is fixed: comment, directive, content (has a chord bracket pair), blank,
//! plain lyric. No cross-line lookahead.

pub mod classify;

pub use classify::{ChartLineClassifier, LineClass, LineKind, classify_text};
