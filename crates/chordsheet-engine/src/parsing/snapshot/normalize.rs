use std::fmt::Write;

use crate::parsing::song::{Entry, SongDocument, WarningKind};

/// Renders a document as a stable, human-readable dump: one node per line,
/// spans in `start..end` form. Node identities are deliberately absent so
/// dumps compare across parses.
pub fn normalize(doc: &SongDocument) -> String {
    let mut out = String::new();

    for directive in &doc.metadata {
        writeln!(out, "meta {} = {:?}", directive.name, directive.value).unwrap();
    }

    for section in &doc.sections {
        write!(
            out,
            "section {} ({:?})",
            section.kind.env_name(),
            section.origin
        )
        .unwrap();
        if let Some(label) = &section.label {
            write!(out, " label={label:?}").unwrap();
        }
        writeln!(out, " {}..{}", section.span.start, section.span.end).unwrap();

        for entry in &section.entries {
            match entry {
                Entry::Line(line) => {
                    writeln!(out, "  line {}..{}", line.span.start, line.span.end).unwrap();
                    for seg in &line.segments {
                        let chord = match &seg.chord {
                            Some(c) if c.is_opaque() => format!("opaque({})", c.render()),
                            Some(c) => c.render(),
                            None => "-".to_string(),
                        };
                        writeln!(out, "    seg {} lyric={:?}", chord, seg.lyric).unwrap();
                    }
                }
                Entry::Comment { text, .. } => writeln!(out, "  comment {text:?}").unwrap(),
                Entry::Blank { .. } => writeln!(out, "  blank").unwrap(),
            }
        }
    }

    for warning in &doc.warnings {
        let name = match &warning.kind {
            WarningKind::UnmatchedSectionClose(k) => format!("unmatched-close({k})"),
            WarningKind::UnterminatedSection(k) => format!("unterminated-section({k})"),
            WarningKind::UnknownDirective(k) => format!("unknown-directive({k})"),
            WarningKind::OpaqueChord => "opaque-chord".to_string(),
            WarningKind::UnterminatedBracket => "unterminated-bracket".to_string(),
        };
        writeln!(
            out,
            "warning {name} {}..{}",
            warning.span.start, warning.span.end
        )
        .unwrap();
    }

    out
}
