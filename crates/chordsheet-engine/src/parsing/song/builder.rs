use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::inline::scan_segments;
use crate::parsing::lines::{LineClass, LineKind};
use crate::parsing::rope::span::Span;

use super::types::{
    ContentLine, Directive, Entry, KNOWN_METADATA, NodeId, ParseWarning, Section, SectionKind,
    SectionOrigin, SongDocument, WarningKind,
};

/// Best-effort section headings: `Chorus:`, `Verse 2`, `Intro`. Only applies
/// outside explicit environments; explicit markers always win.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(verse|chorus|bridge|tab|intro|outro|pre-chorus)\s*\d*\s*:?\s*$")
        .expect("heading regex is valid")
});

/// Returns true when a plain line looks like a section heading.
pub fn is_heading(text: &str) -> bool {
    HEADING_RE.is_match(text.trim())
}

/// Environment directive lookup: `start_of_chorus`, `end_of_verse`, plus the
/// conventional short forms (`soc`, `eov`, ...). Returns (is_start, kind).
pub fn env_directive(name: &str) -> Option<(bool, SectionKind)> {
    if let Some(suffix) = name.strip_prefix("start_of_") {
        return Some((true, SectionKind::from_env(suffix)));
    }
    if let Some(suffix) = name.strip_prefix("end_of_") {
        return Some((false, SectionKind::from_env(suffix)));
    }
    match name {
        "soc" => Some((true, SectionKind::Chorus)),
        "eoc" => Some((false, SectionKind::Chorus)),
        "sov" => Some((true, SectionKind::Verse)),
        "eov" => Some((false, SectionKind::Verse)),
        "sob" => Some((true, SectionKind::Bridge)),
        "eob" => Some((false, SectionKind::Bridge)),
        "sot" => Some((true, SectionKind::Tab)),
        "eot" => Some((false, SectionKind::Tab)),
        _ => None,
    }
}

struct OpenSection {
    id: NodeId,
    kind: SectionKind,
    label: Option<String>,
    origin: SectionOrigin,
    start: usize,
    last_end: usize,
    entries: Vec<Entry>,
}

impl OpenSection {
    fn into_section(self) -> Section {
        Section {
            id: self.id,
            kind: self.kind,
            label: self.label,
            origin: self.origin,
            span: Span::new(self.start, self.last_end),
            entries: self.entries,
        }
    }
}

/// Assembles classified lines into a [`SongDocument`].
///
/// Environment directives push and pop a section stack; a close with no
/// matching open is ignored with a warning and never corrupts the stack.
/// Content outside any environment opens an implicit `plain` section,
/// closed by the next blank line. Assembly is total: any line sequence
/// produces a document.
pub struct SongBuilder {
    metadata: Vec<Directive>,
    sections: Vec<Section>,
    warnings: Vec<ParseWarning>,
    stack: Vec<OpenSection>,
    implicit: Option<OpenSection>,
}

impl SongBuilder {
    pub fn new() -> Self {
        Self {
            metadata: vec![],
            sections: vec![],
            warnings: vec![],
            stack: vec![],
            implicit: None,
        }
    }

    pub fn push(&mut self, lc: &LineClass) {
        match &lc.kind {
            LineKind::Directive { name, value } => self.push_directive(lc, name, value),
            LineKind::Comment { text } => {
                let entry = Entry::Comment {
                    span: lc.content_span(),
                    text: text.clone(),
                };
                self.push_entry(lc, entry);
            }
            LineKind::Blank => {
                if let Some(top) = self.stack.last_mut() {
                    top.entries.push(Entry::Blank { span: lc.span });
                    top.last_end = lc.span.end;
                } else {
                    self.close_implicit();
                }
            }
            LineKind::Content => {
                let out = scan_segments(lc.span.start, &lc.text);
                for sp in &out.opaque_spans {
                    self.warnings.push(ParseWarning {
                        kind: WarningKind::OpaqueChord,
                        span: *sp,
                    });
                }
                if let Some(sp) = out.unterminated {
                    self.warnings.push(ParseWarning {
                        kind: WarningKind::UnterminatedBracket,
                        span: sp,
                    });
                }
                let entry = Entry::Line(ContentLine {
                    id: NodeId::new(),
                    span: lc.content_span(),
                    segments: out.segments,
                });
                self.push_entry(lc, entry);
            }
            LineKind::Plain => {
                if self.stack.is_empty() && is_heading(&lc.text) {
                    self.open_heading_section(lc);
                } else {
                    let entry = Entry::Line(plain_line(lc));
                    self.push_entry(lc, entry);
                }
            }
        }
    }

    pub fn finish(mut self) -> SongDocument {
        while let Some(open) = self.stack.pop() {
            self.warnings.push(ParseWarning {
                kind: WarningKind::UnterminatedSection(open.kind.env_name().to_string()),
                span: Span::new(open.start, open.last_end),
            });
            self.sections.push(open.into_section());
        }
        self.close_implicit();
        // Closing order differs from source order only for nested
        // environments; restore source order.
        self.sections
            .sort_by_key(|s| (s.span.start, s.span.end));
        SongDocument {
            metadata: self.metadata,
            sections: self.sections,
            warnings: self.warnings,
        }
    }

    fn push_directive(&mut self, lc: &LineClass, name: &str, value: &str) {
        match env_directive(name) {
            Some((true, kind)) => {
                self.close_implicit();
                self.stack.push(OpenSection {
                    id: NodeId::new(),
                    kind,
                    label: (!value.is_empty()).then(|| value.to_string()),
                    origin: SectionOrigin::Environment,
                    start: lc.span.start,
                    last_end: lc.span.end,
                    entries: vec![],
                });
            }
            Some((false, kind)) => {
                if self.stack.last().is_some_and(|top| top.kind == kind) {
                    let mut open = self.stack.pop().expect("top was just checked");
                    open.last_end = lc.span.end;
                    self.sections.push(open.into_section());
                } else {
                    self.warnings.push(ParseWarning {
                        kind: WarningKind::UnmatchedSectionClose(kind.env_name().to_string()),
                        span: lc.content_span(),
                    });
                }
            }
            None => {
                if !KNOWN_METADATA.contains(&name) {
                    self.warnings.push(ParseWarning {
                        kind: WarningKind::UnknownDirective(name.to_string()),
                        span: lc.content_span(),
                    });
                }
                self.metadata.push(Directive {
                    name: name.to_string(),
                    value: value.to_string(),
                    span: lc.content_span(),
                });
            }
        }
    }

    /// Routes an entry to the innermost open environment, or to the implicit
    /// section, opening one when nothing is open.
    fn push_entry(&mut self, lc: &LineClass, entry: Entry) {
        let open = if let Some(top) = self.stack.last_mut() {
            top
        } else {
            self.implicit.get_or_insert_with(|| OpenSection {
                id: NodeId::new(),
                kind: SectionKind::Plain,
                label: None,
                origin: SectionOrigin::Implicit,
                start: lc.span.start,
                last_end: lc.span.start,
                entries: vec![],
            })
        };
        open.entries.push(entry);
        open.last_end = lc.span.end;
    }

    fn open_heading_section(&mut self, lc: &LineClass) {
        self.close_implicit();
        let trimmed = lc.text.trim();
        let label = trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end();
        let first_word: String = label
            .chars()
            .take_while(|c| c.is_ascii_alphabetic() || *c == '-')
            .collect();
        self.implicit = Some(OpenSection {
            id: NodeId::new(),
            kind: SectionKind::from_env(&first_word.to_ascii_lowercase()),
            label: Some(label.to_string()),
            origin: SectionOrigin::Heading,
            start: lc.span.start,
            last_end: lc.span.end,
            entries: vec![],
        });
    }

    fn close_implicit(&mut self) {
        if let Some(open) = self.implicit.take() {
            self.sections.push(open.into_section());
        }
    }
}

impl Default for SongBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A lyric line with no chords still becomes a content line, as a single
/// unanchored segment, so lyric fidelity holds uniformly.
fn plain_line(lc: &LineClass) -> ContentLine {
    let span = lc.content_span();
    ContentLine {
        id: NodeId::new(),
        span,
        segments: vec![crate::parsing::inline::Segment {
            chord: None,
            chord_span: None,
            lyric: lc.text.clone(),
            lyric_span: span,
        }],
    }
}

/// Builds the entry (or entries) for one classified line as it would appear
/// inside an already-open section. Used by the incremental controller to
/// rebuild damaged lines without re-running section assembly.
pub fn entry_for_line(lc: &LineClass, warnings: &mut Vec<ParseWarning>) -> Option<Entry> {
    match &lc.kind {
        LineKind::Content => {
            let out = scan_segments(lc.span.start, &lc.text);
            for sp in &out.opaque_spans {
                warnings.push(ParseWarning {
                    kind: WarningKind::OpaqueChord,
                    span: *sp,
                });
            }
            if let Some(sp) = out.unterminated {
                warnings.push(ParseWarning {
                    kind: WarningKind::UnterminatedBracket,
                    span: sp,
                });
            }
            Some(Entry::Line(ContentLine {
                id: NodeId::new(),
                span: lc.content_span(),
                segments: out.segments,
            }))
        }
        LineKind::Plain => Some(Entry::Line(plain_line(lc))),
        LineKind::Comment { text } => Some(Entry::Comment {
            span: lc.content_span(),
            text: text.clone(),
        }),
        LineKind::Blank => Some(Entry::Blank { span: lc.span }),
        // Directives never reach the entry rebuild path; the controller
        // falls back to a full parse when braces are involved.
        LineKind::Directive { .. } => None,
    }
}
