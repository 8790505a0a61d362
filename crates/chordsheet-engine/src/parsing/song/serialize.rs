use super::types::{Entry, Section, SectionOrigin, SongDocument};

/// Renders a document back to its canonical text form.
///
/// Metadata directives come first in source order, then sections: explicit
/// environments wrapped in `start_of_X`/`end_of_X`, heading sections as
/// their heading line, implicit sections bare. Consecutive sections are
/// separated by one blank line (which is exactly what re-splits implicit
/// sections on parse). Law: parsing the output yields a document
/// structurally equal to the input.
pub fn serialize_document(doc: &SongDocument) -> String {
    let mut out = String::new();

    for directive in &doc.metadata {
        out.push('{');
        out.push_str(&directive.name);
        if !directive.value.is_empty() {
            out.push_str(": ");
            out.push_str(&directive.value);
        }
        out.push_str("}\n");
    }

    for (i, section) in doc.sections.iter().enumerate() {
        if i > 0 || !doc.metadata.is_empty() {
            out.push('\n');
        }
        serialize_section(section, &mut out);
    }

    out
}

fn serialize_section(section: &Section, out: &mut String) {
    match section.origin {
        SectionOrigin::Environment => {
            out.push_str("{start_of_");
            out.push_str(section.kind.env_name());
            if let Some(label) = &section.label {
                out.push_str(": ");
                out.push_str(label);
            }
            out.push_str("}\n");
            serialize_entries(section, out);
            out.push_str("{end_of_");
            out.push_str(section.kind.env_name());
            out.push_str("}\n");
        }
        SectionOrigin::Heading => {
            if let Some(label) = &section.label {
                out.push_str(label);
                out.push_str(":\n");
            }
            serialize_entries(section, out);
        }
        SectionOrigin::Implicit => serialize_entries(section, out),
    }
}

fn serialize_entries(section: &Section, out: &mut String) {
    for entry in &section.entries {
        match entry {
            Entry::Line(line) => {
                for seg in &line.segments {
                    if let Some(chord) = &seg.chord {
                        out.push('[');
                        out.push_str(&chord.render());
                        out.push(']');
                    }
                    out.push_str(&seg.lyric);
                }
                out.push('\n');
            }
            Entry::Comment { text, .. } => {
                out.push('#');
                out.push_str(text);
                out.push('\n');
            }
            Entry::Blank { .. } => out.push('\n'),
        }
    }
}
