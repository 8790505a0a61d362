use xi_rope::Rope;

use crate::parsing::lines::{ChartLineClassifier, LineKind, classify_text};
use crate::parsing::parse_document;
use crate::parsing::rope::{RawLine, span::Span};
use crate::parsing::song::{
    Entry, ParseWarning, Section, SectionOrigin, SongDocument, WarningKind, entry_for_line,
    is_heading,
};

/// Incremental reparse: given the previous document, both buffers and the
/// byte range the edit rewrote (pre-edit coordinates), produce the new
/// document.
///
/// The fast path re-tokenizes only the damaged lines and splices the
/// rebuilt entries into their enclosing section; everything outside the
/// damage keeps its node identity, with spans shifted past the edit point.
/// Whenever the damage could change *section structure* — a directive line
/// appearing or disappearing, a heading or blank line in an implicit
/// section, damage outside any section — the controller falls back to a
/// full parse of the new buffer. The fallback is what makes the result
/// correct by construction: the fast path only runs where entry rebuilding
/// is provably equivalent to a full parse.
pub fn reparse(
    prev: &SongDocument,
    prev_buffer: &Rope,
    new_buffer: &Rope,
    changed: std::ops::Range<usize>,
) -> SongDocument {
    match try_incremental(prev, prev_buffer, new_buffer, changed) {
        Some(doc) => doc,
        None => parse_document(new_buffer),
    }
}

fn try_incremental(
    prev: &SongDocument,
    prev_buffer: &Rope,
    new_buffer: &Rope,
    changed: std::ops::Range<usize>,
) -> Option<SongDocument> {
    let delta = new_buffer.len() as isize - prev_buffer.len() as isize;

    // Whole damaged lines, in both coordinate spaces.
    let old_lines = expand_to_lines(prev_buffer, changed.clone());
    let new_end = changed
        .start
        .saturating_add_signed(changed.end as isize - changed.start as isize + delta);
    let new_lines = expand_to_lines(new_buffer, changed.start..new_end);

    // The single section that wholly contains the damage; anything else
    // (metadata header, gaps between sections, edits straddling sections)
    // takes the full-parse path.
    let section_idx = prev
        .sections
        .iter()
        .position(|s| s.span.start <= old_lines.start && old_lines.end <= s.span.end)?;
    let section = &prev.sections[section_idx];

    let old_text = prev_buffer
        .slice_to_cow(old_lines.start..old_lines.end)
        .into_owned();
    let new_text = new_buffer
        .slice_to_cow(new_lines.start..new_lines.end)
        .into_owned();
    if structural_risk(&old_text, section.origin) || structural_risk(&new_text, section.origin) {
        return None;
    }

    // Rebuild the damaged lines as section entries.
    let classifier = ChartLineClassifier;
    let mut new_warnings = Vec::new();
    let mut middle = Vec::new();
    for raw in lines_in_span(new_buffer, new_lines) {
        let lc = classifier.classify(&raw);
        // Directives are excluded by the risk check above.
        let entry = entry_for_line(&lc, &mut new_warnings)?;
        middle.push(entry);
    }

    // Splice: entries before the damage keep everything, entries after it
    // keep identity but shift by the edit delta.
    let mut entries = Vec::with_capacity(section.entries.len() + middle.len());
    let mut tail = Vec::new();
    for entry in &section.entries {
        let span = entry_span(entry);
        if span.end <= old_lines.start {
            entries.push(entry.clone());
        } else if span.start >= old_lines.end {
            tail.push(shift_entry(entry.clone(), delta));
        }
        // Entries overlapping the damage are replaced by the rebuilt middle.
    }
    entries.extend(middle);
    entries.extend(tail);

    let mut sections = Vec::with_capacity(prev.sections.len());
    for (i, s) in prev.sections.iter().enumerate() {
        if i < section_idx {
            sections.push(s.clone());
        } else if i == section_idx {
            // A full parse never produces an implicit section with no
            // entries; if the edit consumed them all, the section goes too.
            if entries.is_empty() && s.origin == SectionOrigin::Implicit {
                continue;
            }
            sections.push(Section {
                id: s.id,
                kind: s.kind.clone(),
                label: s.label.clone(),
                origin: s.origin,
                span: Span::new(s.span.start, s.span.end.saturating_add_signed(delta)),
                entries: std::mem::take(&mut entries),
            });
        } else {
            sections.push(shift_section(s.clone(), delta));
        }
    }

    let mut metadata = Vec::with_capacity(prev.metadata.len());
    for d in &prev.metadata {
        let mut d = d.clone();
        if d.span.start >= old_lines.end {
            d.span = d.span.shifted(delta);
        }
        metadata.push(d);
    }

    let mut warnings: Vec<ParseWarning> = prev
        .warnings
        .iter()
        .filter_map(|w| {
            // Section-level warnings span their whole section; an edit
            // inside the section stretches them rather than killing them.
            let encloses_damage = w.span.start <= old_lines.start && w.span.end >= old_lines.end;
            if matches!(w.kind, WarningKind::UnterminatedSection(_)) && encloses_damage {
                let mut w = w.clone();
                w.span = Span::new(w.span.start, w.span.end.saturating_add_signed(delta));
                Some(w)
            } else if w.span.overlaps(old_lines) {
                // Line-level warnings in the damage are regenerated by the
                // entry rebuild.
                None
            } else if w.span.start >= old_lines.end {
                let mut w = w.clone();
                w.span = w.span.shifted(delta);
                Some(w)
            } else {
                Some(w.clone())
            }
        })
        .collect();
    warnings.extend(new_warnings);

    Some(SongDocument {
        metadata,
        sections,
        warnings,
    })
}

/// True when a damaged line could alter section structure rather than just
/// the entries of the enclosing section.
fn structural_risk(text: &str, origin: SectionOrigin) -> bool {
    text.lines().any(|line| {
        if matches!(classify_text(line), LineKind::Directive { .. }) {
            return true;
        }
        match origin {
            // Inside an environment, headings and blanks are ordinary
            // entries.
            SectionOrigin::Environment => false,
            // In implicit sections a blank splits the section and a
            // heading opens a new one.
            _ => line.trim().is_empty() || is_heading(line),
        }
    })
}

fn entry_span(entry: &Entry) -> Span {
    match entry {
        Entry::Line(line) => line.span,
        Entry::Comment { span, .. } => *span,
        Entry::Blank { span } => *span,
    }
}

fn shift_entry(entry: Entry, delta: isize) -> Entry {
    match entry {
        Entry::Line(mut line) => {
            line.span = line.span.shifted(delta);
            for seg in &mut line.segments {
                seg.lyric_span = seg.lyric_span.shifted(delta);
                if let Some(sp) = seg.chord_span {
                    seg.chord_span = Some(sp.shifted(delta));
                }
            }
            Entry::Line(line)
        }
        Entry::Comment { span, text } => Entry::Comment {
            span: span.shifted(delta),
            text,
        },
        Entry::Blank { span } => Entry::Blank {
            span: span.shifted(delta),
        },
    }
}

fn shift_section(mut section: Section, delta: isize) -> Section {
    section.span = section.span.shifted(delta);
    section.entries = section
        .entries
        .into_iter()
        .map(|e| shift_entry(e, delta))
        .collect();
    section
}

/// Expands a byte range to whole lines: from the start of the line
/// containing `range.start` to the end (newline included) of the line
/// containing `range.end`.
fn expand_to_lines(rope: &Rope, range: std::ops::Range<usize>) -> Span {
    let len = rope.len();
    let start_line = rope.line_of_offset(range.start.min(len));
    let start = rope.offset_of_line(start_line);
    let end_line = rope.line_of_offset(range.end.min(len));
    let last_line = rope.line_of_offset(len);
    let end = if end_line >= last_line {
        len
    } else {
        rope.offset_of_line(end_line + 1)
    };
    Span::new(start, end)
}

/// The raw lines covering `span` (which must be line-aligned).
fn lines_in_span(rope: &Rope, span: Span) -> Vec<RawLine> {
    let text = rope.slice_to_cow(span.start..span.end).into_owned();
    let mut out = Vec::new();
    let mut offset = span.start;
    for piece in text.split_inclusive('\n') {
        let start = offset;
        offset += piece.len();
        out.push(RawLine {
            span: Span::new(start, offset),
            text: piece.to_string(),
        });
    }
    out
}
