use crate::parsing::rope::{lines::RawLine, span::Span};

/// What a single line is, decided in fixed priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `# ...` after optional leading whitespace. Carries the text after `#`.
    Comment { text: String },
    /// A line fully wrapped in `{` `}`. Name is normalized to lowercase;
    /// a missing `:` means a bare directive with an empty value.
    Directive { name: String, value: String },
    /// Contains at least one `[` ... `]` pair, to be segment-scanned.
    Content,
    Blank,
    /// Lyric/text line with no chord brackets.
    Plain,
}

/// Classification of a single line containing only local facts.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of the line (trailing newline included).
    pub span: Span,
    /// Line text with the terminator stripped.
    pub text: String,
    pub kind: LineKind,
}

impl LineClass {
    /// Span of the line without its terminator.
    pub fn content_span(&self) -> Span {
        Span::new(self.span.start, self.span.start + self.text.len())
    }
}

/// Classifies individual lines for the song assembly phase.
pub struct ChartLineClassifier;

impl ChartLineClassifier {
    pub fn classify(&self, line: &RawLine) -> LineClass {
        let text = line.text.trim_end_matches(['\r', '\n']).to_string();
        let kind = classify_text(&text);
        LineClass {
            span: line.span,
            text,
            kind,
        }
    }
}

/// Classifies a string in its raw form, used both on rope lines and on the
/// would-be text of an edit when deciding whether an incremental reparse can
/// stay bounded.
pub fn classify_text(text: &str) -> LineKind {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix('#') {
        return LineKind::Comment {
            text: rest.to_string(),
        };
    }

    if trimmed.len() >= 2
        && trimmed.starts_with('{')
        && trimmed.ends_with('}')
    {
        let inner = &trimmed[1..trimmed.len() - 1];
        let (name, value) = match inner.split_once(':') {
            Some((name, value)) => (name, value),
            None => (inner, ""),
        };
        return LineKind::Directive {
            name: name.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        };
    }

    if let Some(open) = text.find('[')
        && text[open + 1..].contains(']')
    {
        return LineKind::Content;
    }

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    LineKind::Plain
}
