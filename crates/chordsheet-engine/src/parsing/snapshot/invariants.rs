use xi_rope::Rope;

use crate::parsing::rope::slice_to_string;
use crate::parsing::song::{Entry, SongDocument};

/// Panics if any span bookkeeping of the document is inconsistent with the
/// buffer it was parsed from. Run by tests after every parse and reparse.
///
/// Checks, per spec: spans in bounds and properly nested, lyric spans that
/// slice back to exactly the stored lyric text, and whole content lines
/// reconstructible from their chord + lyric spans.
pub fn check(rope: &Rope, doc: &SongDocument) {
    let len = rope.len();

    for directive in &doc.metadata {
        assert!(
            directive.span.end <= len,
            "directive span {:?} out of bounds (len {len})",
            directive.span
        );
    }

    for section in &doc.sections {
        assert!(
            section.span.start <= section.span.end && section.span.end <= len,
            "section span {:?} out of bounds (len {len})",
            section.span
        );

        for entry in &section.entries {
            let entry_span = match entry {
                Entry::Line(line) => line.span,
                Entry::Comment { span, .. } => *span,
                Entry::Blank { span } => *span,
            };
            assert!(
                entry_span.start >= section.span.start && entry_span.end <= section.span.end,
                "entry span {entry_span:?} escapes section {:?}",
                section.span
            );

            if let Entry::Line(line) = entry {
                let mut rebuilt = String::new();
                for seg in &line.segments {
                    if let Some(chord_span) = seg.chord_span {
                        assert!(
                            chord_span.start >= line.span.start
                                && chord_span.end <= line.span.end,
                            "chord span {chord_span:?} escapes line {:?}",
                            line.span
                        );
                        rebuilt.push_str(&slice_to_string(rope, chord_span));
                    }
                    assert_eq!(
                        slice_to_string(rope, seg.lyric_span),
                        seg.lyric,
                        "lyric span does not slice back to the stored lyric"
                    );
                    rebuilt.push_str(&seg.lyric);
                }
                assert_eq!(
                    rebuilt,
                    slice_to_string(rope, line.span),
                    "segments do not reconstruct the line"
                );
            }
        }
    }
}
