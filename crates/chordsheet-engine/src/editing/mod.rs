//! # Editing core
//!
//! The host-facing edit loop. A [`Document`] owns the rope buffer as the
//! single source of truth; every change flows through a [`Cmd`], compiles
//! to an xi-rope delta, and drives the incremental reparse in
//! [`reparse`]. The returned [`Patch`] carries the changed ranges, the
//! transformed selection and the new version number.
//!
//! The controller contract is a pure function: previous document +
//! previous buffer + new buffer + changed range in, new document out. All
//! mutable state lives in `Document`, which the host owns exclusively.

pub mod commands;
pub mod document;
pub mod patch;
pub mod reparse;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
pub use reparse::reparse;
