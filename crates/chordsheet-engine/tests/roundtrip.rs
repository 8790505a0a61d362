//! The serialization laws: parsing the canonical text of a parsed document
//! reproduces the document, and canonical text is a fixed point.

use chordsheet_engine::{parse_str, serialize_document, transpose_document};
use pretty_assertions::assert_eq;

const CORPUS: &[&str] = &[
    "",
    "\n\n\n",
    "{title: Amazing Grace}\n{key: G}\n\n[G]Amazing [C]grace\nhow sweet the sound\n",
    "{start_of_chorus}\n[G]la\n\n[C]la\n{end_of_chorus}\n",
    "{soc}\nshort forms\n{eoc}\n",
    "{end_of_chorus}\nstray close\n",
    "{start_of_verse: Verse 2}\n[G]a[Am]b\n",
    "Chorus:\n[G]la\n\nVerse 2\nplain line\n",
    "# comment at top\n\n[G]la [G\nbroken [bracket\n",
    "{weird: value}\n{capo}\n[]empty\n[N.C.]tacet\n",
    "word [C] word\n\nsecond block\n",
    "{start_of_verse}\n{start_of_chorus}\nnested\n{end_of_chorus}\n{end_of_verse}\n",
    "{start_of_verse}\n# inner comment\n\n[D/F#]slash\n{end_of_verse}\n",
    "{key: Bb}\n[Bb]flat [Eb]keys [F7]here\n",
];

#[test]
fn parse_serialize_parse_is_stable() {
    for text in CORPUS {
        let first = parse_str(text);
        let canonical = serialize_document(&first);
        let second = parse_str(&canonical);
        assert!(
            first.same_structure(&second),
            "round-trip changed structure for {text:?}\ncanonical: {canonical:?}"
        );
    }
}

#[test]
fn canonical_text_is_a_fixed_point() {
    for text in CORPUS {
        let canonical = serialize_document(&parse_str(text));
        let again = serialize_document(&parse_str(&canonical));
        assert_eq!(canonical, again, "serialization not stable for {text:?}");
    }
}

#[test]
fn lyric_fidelity_across_the_corpus() {
    use chordsheet_engine::Entry;
    use xi_rope::Rope;

    for text in CORPUS {
        let rope = Rope::from(*text);
        let doc = parse_str(text);
        for section in &doc.sections {
            for entry in &section.entries {
                let Entry::Line(line) = entry else { continue };
                // The lyric is exactly the line with chord tokens removed.
                let mut expected = String::new();
                let mut cursor = line.span.start;
                for seg in &line.segments {
                    if let Some(chord_span) = seg.chord_span {
                        expected
                            .push_str(&rope.slice_to_cow(cursor..chord_span.start));
                        cursor = chord_span.end;
                    }
                }
                expected.push_str(&rope.slice_to_cow(cursor..line.span.end));
                assert_eq!(line.lyric(), expected, "lyric fidelity in {text:?}");
            }
        }
    }
}

#[test]
fn transpose_by_twelve_is_structural_identity() {
    for text in CORPUS {
        let doc = parse_str(text);
        let (same, _) = transpose_document(&doc, 12, None);
        assert!(same.same_structure(&doc), "transpose by 12 changed {text:?}");
    }
}

#[test]
fn transpose_involution_preserves_pitches() {
    use chordsheet_engine::{ChordSymbol, Entry, SongDocument};

    fn pitch_shape(doc: &SongDocument) -> Vec<(Option<u8>, Option<u8>, String, String)> {
        doc.sections
            .iter()
            .flat_map(|s| &s.entries)
            .filter_map(|e| match e {
                Entry::Line(line) => Some(line),
                _ => None,
            })
            .flat_map(|l| &l.segments)
            .filter_map(|seg| seg.chord.as_ref().map(|c| (c, seg.lyric.clone())))
            .map(|(chord, lyric)| match chord {
                ChordSymbol::Parsed(t) => (
                    Some(t.root.value()),
                    t.bass.map(|b| b.value()),
                    t.suffix.clone(),
                    lyric,
                ),
                ChordSymbol::Opaque(o) => (None, None, o.clone(), lyric),
            })
            .collect()
    }

    for text in CORPUS {
        let doc = parse_str(text);
        for n in [1, 2, 5, 7, 11] {
            let (up, _) = transpose_document(&doc, n, Some(true));
            let (back, _) = transpose_document(&up, -n, Some(true));
            assert_eq!(
                pitch_shape(&back),
                pitch_shape(&doc),
                "involution by {n} failed for {text:?}"
            );
        }
    }
}

#[test]
fn transposed_documents_round_trip_too() {
    for text in CORPUS {
        let (transposed, canonical) = transpose_document(&parse_str(text), 3, None);
        let reparsed = parse_str(&canonical);
        assert!(
            transposed.same_structure(&reparsed),
            "transposed round-trip failed for {text:?}"
        );
    }
}
