//! # Preview rendering
//!
//! Turns a parsed document into a layout-ready tree: per content line a
//! chord row over a lyric row, with each chord placed at the character
//! column where its lyric span starts. When chords crowd each other the
//! lyric row gains compensating padding so chord glyphs never overlap —
//! a rendering-only adjustment that leaves the parsed lyric spans alone.
//!
//! Rows are serializable so hosts can ship them across any boundary.

use serde::Serialize;

use crate::parsing::song::{ContentLine, Entry, NodeId, Section, SectionOrigin, SongDocument};

/// The render-ready view of a document. `version` tags which document
/// state the tree was derived from; hosts drop trees older than their
/// document.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewTree {
    pub version: u64,
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PreviewRow {
    /// Rendering hint for a section: kind name and optional label.
    SectionHeading {
        id: NodeId,
        kind: String,
        label: Option<String>,
    },
    /// A content line laid out as chord row over lyric row.
    ChordLyric {
        id: NodeId,
        chord_row: String,
        lyric_row: String,
        chords: Vec<PositionedChord>,
    },
    Comment {
        text: String,
    },
    Blank,
}

/// One chord glyph and the lyric-row character column it sits above.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedChord {
    pub col: usize,
    pub text: String,
}

/// Lays out every section of the document as preview rows.
pub fn preview_rows(doc: &SongDocument) -> Vec<PreviewRow> {
    let mut rows = Vec::new();
    for (i, section) in doc.sections.iter().enumerate() {
        if i > 0 {
            rows.push(PreviewRow::Blank);
        }
        if let Some(heading) = heading_row(section) {
            rows.push(heading);
        }
        for entry in &section.entries {
            match entry {
                Entry::Line(line) => rows.push(layout_line(line)),
                Entry::Comment { text, .. } => rows.push(PreviewRow::Comment {
                    text: text.clone(),
                }),
                Entry::Blank { .. } => rows.push(PreviewRow::Blank),
            }
        }
    }
    rows
}

/// Implicit plain sections render without a heading; everything declared
/// (environment or heading line) shows its kind and label.
fn heading_row(section: &Section) -> Option<PreviewRow> {
    if section.origin == SectionOrigin::Implicit {
        return None;
    }
    Some(PreviewRow::SectionHeading {
        id: section.id,
        kind: section.kind.env_name().to_string(),
        label: section.label.clone(),
    })
}

fn layout_line(line: &ContentLine) -> PreviewRow {
    let mut chord_row = String::new();
    let mut lyric_row = String::new();
    let mut chords = Vec::new();
    let mut lyric_cols = 0usize;
    let mut chord_cols = 0usize;

    for seg in &line.segments {
        if let Some(chord) = &seg.chord {
            let text = chord.render();
            // Natural column: where this segment's lyric starts.
            let mut col = lyric_cols;
            // Keep at least one space after the previous chord glyph.
            let min_col = if chords.is_empty() { 0 } else { chord_cols + 1 };
            if col < min_col {
                let pad = min_col - col;
                lyric_row.extend(std::iter::repeat_n(' ', pad));
                lyric_cols += pad;
                col = min_col;
            }
            chord_row.extend(std::iter::repeat_n(' ', col - chord_cols));
            chord_row.push_str(&text);
            chord_cols = col + text.chars().count();
            chords.push(PositionedChord { col, text });
        }
        lyric_row.push_str(&seg.lyric);
        lyric_cols += seg.lyric.chars().count();
    }

    PreviewRow::ChordLyric {
        id: line.id,
        chord_row,
        lyric_row,
        chords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_str;

    fn chord_lyric_rows(rows: &[PreviewRow]) -> Vec<(&str, &str)> {
        rows.iter()
            .filter_map(|r| match r {
                PreviewRow::ChordLyric {
                    chord_row,
                    lyric_row,
                    ..
                } => Some((chord_row.as_str(), lyric_row.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn chords_sit_over_their_lyric_columns() {
        let doc = parse_str("[G]Amazing [C]grace\n");
        let rows = preview_rows(&doc);
        let pairs = chord_lyric_rows(&rows);
        assert_eq!(pairs, vec![("G       C", "Amazing grace")]);
    }

    #[test]
    fn crowded_chords_pad_the_lyric_row_only() {
        let doc = parse_str("[G]a[Am]b[C7]c\n");
        let rows = preview_rows(&doc);
        let pairs = chord_lyric_rows(&rows);
        assert_eq!(pairs, vec![("G Am C7", "a b  c")]);
        // The model's lyric text is unchanged by the padding.
        assert_eq!(
            doc.sections[0].entries.len(),
            1
        );
        match &doc.sections[0].entries[0] {
            crate::parsing::song::Entry::Line(line) => assert_eq!(line.lyric(), "abc"),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn plain_lines_render_with_empty_chord_row() {
        let doc = parse_str("no chords here\n");
        let pairs_owned = preview_rows(&doc);
        let pairs = chord_lyric_rows(&pairs_owned);
        assert_eq!(pairs, vec![("", "no chords here")]);
    }

    #[test]
    fn sections_get_headings_and_separators() {
        let doc = parse_str("{start_of_chorus: Hook}\n[G]la\n{end_of_chorus}\n\n[C]coda\n");
        let rows = preview_rows(&doc);
        assert!(matches!(
            &rows[0],
            PreviewRow::SectionHeading { kind, label, .. }
                if kind == "chorus" && label.as_deref() == Some("Hook")
        ));
        // Separator between the chorus and the trailing implicit section.
        assert!(matches!(rows[2], PreviewRow::Blank));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn comments_and_blanks_pass_through() {
        let doc = parse_str("{start_of_verse}\n# fingerpick here\n\n[G]la\n{end_of_verse}\n");
        let rows = preview_rows(&doc);
        assert!(matches!(&rows[1], PreviewRow::Comment { text } if text == " fingerpick here"));
        assert!(matches!(rows[2], PreviewRow::Blank));
    }

    #[test]
    fn opaque_chords_render_verbatim() {
        let doc = parse_str("[N.C.]stop\n");
        let pairs_owned = preview_rows(&doc);
        let pairs = chord_lyric_rows(&pairs_owned);
        assert_eq!(pairs, vec![("N.C.", "stop")]);
    }
}
