//! # Chord autocompletion
//!
//! Given a cursor offset, decide whether it sits inside an open `[` chord
//! context and rank completions from a fixed vocabulary. Chords diatonic to
//! the document's declared key come first, then shorter tokens, then
//! lexical order, capped at [`MAX_SUGGESTIONS`].

use std::sync::OnceLock;

use serde::Serialize;
use xi_rope::Rope;

use crate::error::EngineError;
use crate::music::{ChordSymbol, PitchClass, Quality, parse_chord};
use crate::parsing::song::{ContentLine, Entry, SongDocument};

/// Upper bound on returned suggestions, keeping host UIs responsive.
pub const MAX_SUGGESTIONS: usize = 20;

/// A ranked chord completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    /// Whether the chord is diatonic to the document's declared key.
    pub diatonic: bool,
}

struct VocabEntry {
    text: String,
    root: PitchClass,
    quality: Quality,
}

/// Root spellings worth completing: naturals plus the practical sharp and
/// flat names.
const ROOTS: [&str; 17] = [
    "A", "A#", "Ab", "B", "Bb", "C", "C#", "D", "D#", "Db", "E", "Eb", "F", "F#", "G", "G#", "Gb",
];

/// Common qualities and extensions, the same vocabulary the chord grammar
/// accepts.
const SUFFIXES: [&str; 15] = [
    "", "m", "7", "m7", "maj7", "6", "m6", "9", "add9", "sus2", "sus4", "dim", "dim7", "aug",
    "m7b5",
];

fn vocabulary() -> &'static [VocabEntry] {
    static VOCAB: OnceLock<Vec<VocabEntry>> = OnceLock::new();
    VOCAB.get_or_init(|| {
        let mut entries = Vec::with_capacity(ROOTS.len() * SUFFIXES.len());
        for root in ROOTS {
            for suffix in SUFFIXES {
                let text = format!("{root}{suffix}");
                match parse_chord(&text) {
                    ChordSymbol::Parsed(token) => entries.push(VocabEntry {
                        text,
                        root: token.root,
                        quality: token.quality,
                    }),
                    // The vocabulary is built from the grammar tables, so
                    // every entry parses.
                    ChordSymbol::Opaque(_) => unreachable!("vocabulary entry must parse"),
                }
            }
        }
        entries
    })
}

/// Chord completions for `cursor`. Empty when the cursor is not inside an
/// open bracket context; `Err` only for a cursor outside the buffer.
pub fn suggest(
    doc: &SongDocument,
    buffer: &Rope,
    cursor: usize,
) -> Result<Vec<Suggestion>, EngineError> {
    if cursor > buffer.len() {
        return Err(EngineError::CursorOutOfBounds {
            offset: cursor,
            len: buffer.len(),
        });
    }

    let Some(line) = line_for_cursor(doc, cursor) else {
        return Ok(vec![]);
    };
    let text = buffer
        .slice_to_cow(line.span.start..line.span.end)
        .into_owned();
    let local = cursor - line.span.start;

    let Some(partial) = open_bracket_prefix(&text, local) else {
        return Ok(vec![]);
    };

    let key = doc.key();
    let mut matches: Vec<Suggestion> = vocabulary()
        .iter()
        .filter(|entry| prefix_matches(&entry.text, partial))
        .map(|entry| Suggestion {
            text: entry.text.clone(),
            diatonic: key.is_some_and(|k| k.is_diatonic(entry.root, entry.quality)),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.diatonic
            .cmp(&a.diatonic)
            .then(a.text.len().cmp(&b.text.len()))
            .then(a.text.cmp(&b.text))
    });
    matches.truncate(MAX_SUGGESTIONS);
    Ok(matches)
}

/// The partially typed token when `local` sits after an unclosed `[`.
/// `None` for cursors not on a char boundary.
fn open_bracket_prefix(text: &str, local: usize) -> Option<&str> {
    let before = text.get(..local)?;
    let open = before.rfind('[')?;
    let partial = &before[open + 1..];
    if partial.contains(']') {
        return None;
    }
    Some(partial)
}

/// Prefix match, case-insensitive on the root letter only.
fn prefix_matches(candidate: &str, partial: &str) -> bool {
    if partial.is_empty() {
        return true;
    }
    let (c_first, p_first) = (candidate.as_bytes()[0], partial.as_bytes()[0]);
    if !c_first.eq_ignore_ascii_case(&p_first) {
        return false;
    }
    candidate[1..].starts_with(&partial[1..])
}

/// Position mapping with an inclusive end, so a cursor at the end of a line
/// (the common typing position) still resolves to it.
fn line_for_cursor(doc: &SongDocument, cursor: usize) -> Option<&ContentLine> {
    doc.sections.iter().find_map(|section| {
        section.entries.iter().find_map(|entry| match entry {
            Entry::Line(line)
                if line.span.start <= cursor && cursor <= line.span.end =>
            {
                Some(line)
            }
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_str;

    fn suggest_at(text: &str, cursor: usize) -> Vec<Suggestion> {
        let doc = parse_str(text);
        suggest(&doc, &Rope::from(text), cursor).unwrap()
    }

    #[test]
    fn open_bracket_at_line_end_suggests() {
        let text = "{key: G}\n[G";
        let got = suggest_at(text, text.len());
        assert_eq!(got[0].text, "G");
        assert!(got[0].diatonic);
        // Diatonic chords outrank non-diatonic ones sharing the prefix.
        let first_non_diatonic = got.iter().position(|s| !s.diatonic);
        if let Some(pos) = first_non_diatonic {
            assert!(got[..pos].iter().all(|s| s.diatonic));
            assert!(got[pos..].iter().all(|s| !s.diatonic));
        }
        assert!(got.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn empty_partial_lists_the_key_chords_first() {
        let text = "{key: G}\n[C]la [";
        let got = suggest_at(text, text.len());
        assert_eq!(got.len(), MAX_SUGGESTIONS);
        assert!(got[0].diatonic);
        // Single-letter diatonic roots of G major come before extensions.
        let names: Vec<&str> = got.iter().map(|s| s.text.as_str()).collect();
        assert!(names.contains(&"G"));
        assert!(names.contains(&"C"));
        assert!(names.contains(&"D"));
        assert!(names.contains(&"Em"));
    }

    #[test]
    fn cursor_outside_brackets_is_quiet() {
        let text = "{key: G}\n[G]Amazing";
        assert!(suggest_at(text, text.len()).is_empty());
        assert!(suggest_at(text, 4).is_empty());
    }

    #[test]
    fn closed_bracket_is_quiet() {
        let text = "[G]la";
        assert!(suggest_at(text, 5).is_empty());
    }

    #[test]
    fn lowercase_root_still_matches() {
        let text = "{key: C}\n[a";
        let got = suggest_at(text, text.len());
        assert!(got.iter().any(|s| s.text == "Am"));
        assert!(got.iter().any(|s| s.text == "A"));
    }

    #[test]
    fn out_of_bounds_cursor_is_a_contract_violation() {
        let doc = parse_str("[G]la");
        let err = suggest(&doc, &Rope::from("[G]la"), 99).unwrap_err();
        assert_eq!(err, EngineError::CursorOutOfBounds { offset: 99, len: 5 });
    }

    #[test]
    fn no_key_means_no_diatonic_boost() {
        let text = "[G";
        let got = suggest_at(text, text.len());
        assert!(got.iter().all(|s| !s.diatonic));
        assert_eq!(got[0].text, "G");
    }

    #[test]
    fn mid_token_cursor_completes_the_prefix() {
        let text = "{key: G}\n[Gmaj]la";
        // Cursor right after "Gma".
        let cursor = text.find("Gmaj").unwrap() + 3;
        let got = suggest_at(text, cursor);
        assert!(got.iter().all(|s| s.text.starts_with("Gma")));
        assert!(got.iter().any(|s| s.text == "Gmaj7"));
    }
}
