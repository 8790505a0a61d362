//! Test support: a deterministic plain-text dump of a parsed document and
//! an invariant checker for span bookkeeping. Used by the snapshot tests.

pub mod invariants;
pub mod normalize;

pub use invariants::check;
pub use normalize::normalize;
