//! # Document transposition
//!
//! Rewrites every parsed chord of a document by a semitone delta, the
//! `{key}` directive included. Produces a new document and its canonical
//! text; the source document is never touched, which keeps undo trivial
//! for hosts. Opaque chords and all lyric text pass through unchanged.

use crate::music::Key;
use crate::parsing::song::{Directive, Entry, Section, SongDocument, serialize_document};

/// Transposes `doc` by `semitones` (taken mod 12) and serializes the
/// result.
///
/// Spelling preference: an explicit `prefer_sharps` wins; otherwise it is
/// derived from the transposed declared key, falling back to sharps when no
/// key is declared. A delta of zero returns an untouched copy — existing
/// spellings are only normalized when pitches actually move.
///
/// Byte spans in the returned document still address the *source* buffer;
/// hosts adopt the new text by feeding it back through their buffer-change
/// path, which re-derives positions.
pub fn transpose_document(
    doc: &SongDocument,
    semitones: i32,
    prefer_sharps: Option<bool>,
) -> (SongDocument, String) {
    let n = semitones.rem_euclid(12);
    if n == 0 {
        let copy = doc.clone();
        let text = serialize_document(&copy);
        return (copy, text);
    }

    let target_key = doc.key().map(|k| k.transposed(n));
    let prefer = prefer_sharps
        .or(target_key.map(Key::prefer_sharps))
        .unwrap_or(true);

    let metadata = doc
        .metadata
        .iter()
        .map(|d| transpose_directive(d, n, prefer))
        .collect();

    let sections = doc
        .sections
        .iter()
        .map(|s| transpose_section(s, n, prefer))
        .collect();

    let transposed = SongDocument {
        metadata,
        sections,
        warnings: doc.warnings.clone(),
    };
    let text = serialize_document(&transposed);
    (transposed, text)
}

fn transpose_directive(d: &Directive, n: i32, prefer: bool) -> Directive {
    let value = match (d.name.as_str(), Key::parse(&d.value)) {
        ("key", Some(key)) => key.transposed(n).render_with(prefer),
        // An unparsable key value is left alone, like any opaque token.
        _ => d.value.clone(),
    };
    Directive {
        name: d.name.clone(),
        value,
        span: d.span,
    }
}

fn transpose_section(section: &Section, n: i32, prefer: bool) -> Section {
    let entries = section
        .entries
        .iter()
        .map(|entry| match entry {
            Entry::Line(line) => {
                let mut line = line.clone();
                for seg in &mut line.segments {
                    if let Some(chord) = &seg.chord {
                        seg.chord = Some(chord.transposed(n, prefer));
                    }
                }
                Entry::Line(line)
            }
            other => other.clone(),
        })
        .collect();
    Section {
        id: section.id,
        kind: section.kind.clone(),
        label: section.label.clone(),
        origin: section.origin,
        span: section.span,
        entries,
    }
}
