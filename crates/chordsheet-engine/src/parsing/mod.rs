pub mod inline;
pub mod lines;
pub mod rope;
pub mod snapshot;
pub mod song;

use xi_rope::Rope;

use lines::ChartLineClassifier;
use rope::raw_lines;
use song::{SongBuilder, SongDocument};

/// Full parse: classify every line of the buffer and assemble the document.
///
/// Total by construction — any byte buffer yields a `SongDocument`,
/// possibly with warnings attached.
pub fn parse_document(rope: &Rope) -> SongDocument {
    let classifier = ChartLineClassifier;
    let mut builder = SongBuilder::new();
    for raw in raw_lines(rope) {
        let lc = classifier.classify(&raw);
        builder.push(&lc);
    }
    builder.finish()
}

/// Convenience for tests and hosts holding plain strings.
pub fn parse_str(text: &str) -> SongDocument {
    parse_document(&Rope::from(text))
}
