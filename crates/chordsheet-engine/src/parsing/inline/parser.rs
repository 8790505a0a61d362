use crate::music::{ChordSymbol, parse_chord};
use crate::parsing::rope::span::Span;

use super::cursor::Cursor;

/// One (chord, lyric-span) pair of a content line.
///
/// `lyric` is the substring the chord is anchored before; a segment with no
/// chord is either the leading unanchored text or a plain lyric line.
/// Invariant: concatenating `lyric` over a line's segments in order
/// reproduces the line's lyric text exactly, whitespace preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub chord: Option<ChordSymbol>,
    /// Span of the bracketed chord token, brackets included.
    pub chord_span: Option<Span>,
    pub lyric: String,
    pub lyric_span: Span,
}

/// Result of scanning one content line.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub segments: Vec<Segment>,
    /// Spans of chord tokens that fell back to opaque.
    pub opaque_spans: Vec<Span>,
    /// Span from an unterminated `[` to end of line, if one occurred.
    pub unterminated: Option<Span>,
}

/// Scans a content line into segments.
///
/// - `base`: byte offset of `s` in the buffer (for absolute spans)
/// - `s`: the line text without its terminator
pub fn scan_segments(base: usize, s: &str) -> ScanOutcome {
    let mut cur = Cursor::new(s, base);
    let mut out = ScanOutcome::default();

    // Leading text before the first bracket is an unanchored segment.
    let lead_start = cur.pos();
    while let Some(b) = cur.peek() {
        if b == b'[' {
            break;
        }
        cur.bump();
    }
    let lead = s[..cur.i].to_string();
    if !lead.is_empty() {
        out.segments.push(Segment {
            chord: None,
            chord_span: None,
            lyric: lead,
            lyric_span: Span::new(lead_start, cur.pos()),
        });
    }

    while !cur.eof() {
        let bracket_start = cur.pos();
        cur.bump(); // [

        let Some(chord_text) = cur.take_until(b']') else {
            // Unterminated bracket: literal lyric from `[` onward.
            let tail_span = Span::new(bracket_start, base + s.len());
            let tail = s[bracket_start - base..].to_string();
            out.unterminated = Some(tail_span);
            match out.segments.last_mut() {
                Some(last) => {
                    last.lyric.push_str(&tail);
                    last.lyric_span = Span::new(last.lyric_span.start, tail_span.end);
                }
                None => out.segments.push(Segment {
                    chord: None,
                    chord_span: None,
                    lyric: tail,
                    lyric_span: tail_span,
                }),
            }
            return out;
        };

        let chord_span = Span::new(bracket_start, cur.pos());
        let chord = parse_chord(chord_text);
        if chord.is_opaque() {
            out.opaque_spans.push(chord_span);
        }

        let lyric_start = cur.pos();
        while let Some(b) = cur.peek() {
            if b == b'[' {
                break;
            }
            cur.bump();
        }
        let lyric = s[lyric_start - base..cur.i].to_string();

        out.segments.push(Segment {
            chord: Some(chord),
            chord_span: Some(chord_span),
            lyric,
            lyric_span: Span::new(lyric_start, cur.pos()),
        });
    }

    out
}
