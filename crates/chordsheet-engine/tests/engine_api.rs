//! The engine boundary, exercised the way a host would drive it: parse on
//! buffer change, preview, suggest, transpose, save.

use chordsheet_engine::{
    ChordSymbol, Cmd, Document, Entry, PreviewRow, parse_str, serialize_document,
};

fn segment_names(doc: &chordsheet_engine::SongDocument) -> Vec<(Option<String>, String)> {
    doc.sections
        .iter()
        .flat_map(|s| &s.entries)
        .filter_map(|e| match e {
            Entry::Line(line) => Some(line),
            _ => None,
        })
        .flat_map(|l| &l.segments)
        .map(|seg| (seg.chord.as_ref().map(ChordSymbol::render), seg.lyric.clone()))
        .collect()
}

#[test]
fn amazing_grace_example() {
    let doc = Document::new("{title: Amazing Grace}\n{key: G}\n[G]Amazing [C]grace");
    let song = doc.song();

    assert_eq!(song.title(), Some("Amazing Grace"));
    assert_eq!(song.metadata_value("key"), Some("G"));
    assert_eq!(
        segment_names(song),
        vec![
            (Some("G".into()), "Amazing ".into()),
            (Some("C".into()), "grace".into()),
        ]
    );

    let (transposed, text) = doc.transpose(2, Some(true));
    assert_eq!(
        segment_names(&transposed),
        vec![
            (Some("A".into()), "Amazing ".into()),
            (Some("D".into()), "grace".into()),
        ]
    );
    assert_eq!(transposed.metadata_value("key"), Some("A"));
    // The new text reparses to the same structure (round-trip law).
    assert!(parse_str(&text).same_structure(&transposed));
}

#[test]
fn suggestion_example_in_g() {
    let text = "{title: x}\n{key: G}\n[G]la la\n[G";
    let doc = Document::new(text);
    let got = doc.suggestions(text.len()).unwrap();

    // Diatonic chords of G (G, Em, C, D families) outrank everything else
    // sharing the typed prefix.
    assert_eq!(got[0].text, "G");
    let non_diatonic_start = got
        .iter()
        .position(|s| !s.diatonic)
        .unwrap_or(got.len());
    assert!(got[..non_diatonic_start].iter().all(|s| s.diatonic));
    assert!(got[non_diatonic_start..].iter().all(|s| !s.diatonic));
    assert!(got.iter().any(|s| s.text == "G7"));
}

#[test]
fn typing_a_chord_then_previewing() {
    let mut doc = Document::new("{key: G}\n[G]Amazing grace\n");

    // Open a bracket mid-lyric and type a chord, the editor hot path.
    let at = doc.text().find("grace").unwrap();
    doc.apply(Cmd::InsertText {
        at,
        text: "[".into(),
    })
    .unwrap();
    let got = doc.suggestions(at + 1).unwrap();
    assert!(!got.is_empty());
    assert!(got[0].diatonic);

    doc.apply(Cmd::InsertText {
        at: at + 1,
        text: "C]".into(),
    })
    .unwrap();
    assert_eq!(doc.text(), "{key: G}\n[G]Amazing [C]grace\n");

    let preview = doc.preview();
    assert_eq!(preview.version, doc.version());
    let row = preview
        .rows
        .iter()
        .find_map(|r| match r {
            PreviewRow::ChordLyric {
                chord_row,
                lyric_row,
                ..
            } => Some((chord_row.clone(), lyric_row.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(row, ("G       C".to_string(), "Amazing grace".to_string()));
}

#[test]
fn stable_line_identity_across_typing() {
    let mut doc = Document::new("{start_of_verse}\n[G]one\n[C]two\n{end_of_verse}\n");
    let id_of = |doc: &Document, needle: &str| {
        let at = doc.text().find(needle).unwrap();
        doc.song().line_at(at).unwrap().id
    };
    let two_before = id_of(&doc, "two");

    let at = doc.text().find("one").unwrap();
    doc.apply(Cmd::InsertText {
        at,
        text: "x".into(),
    })
    .unwrap();

    // The untouched line keeps its identity for UI state.
    assert_eq!(id_of(&doc, "two"), two_before);
}

#[test]
fn save_hands_back_the_exact_buffer() {
    let text = "{key: G}\n[G]la  [C\nweird   spacing\n";
    let doc = Document::new(text);
    assert_eq!(doc.text(), text);
}

#[test]
fn serialize_is_what_transpose_returns() {
    let doc = Document::new("{key: G}\n[G]la\n");
    let (transposed, text) = doc.transpose(5, None);
    assert_eq!(serialize_document(&transposed), text);
}

#[test]
fn version_orders_derived_artifacts() {
    let mut doc = Document::new("[G]la\n");
    let stale = doc.preview();
    doc.apply(Cmd::InsertText {
        at: 0,
        text: "x".into(),
    })
    .unwrap();
    let fresh = doc.preview();
    // Last-edit-wins: the host drops anything older than the document.
    assert!(stale.version < fresh.version);
    assert_eq!(fresh.version, doc.version());
}
