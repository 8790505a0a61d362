use serde::Serialize;
use uuid::Uuid;

use crate::music::Key;
use crate::parsing::inline::Segment;
use crate::parsing::rope::span::Span;

/// Stable identity for a section or content line.
///
/// Identities survive incremental reparse for nodes the edit did not touch,
/// so hosts can hang selection/scroll state off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(Uuid);

impl NodeId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> NodeId {
        NodeId(Uuid::new_v4())
    }
}

/// A `{name: value}` line. Names are normalized to lowercase; environment
/// markers never become `Directive` values in the document, they open and
/// close sections instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
    pub span: Span,
}

/// The kind of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Verse,
    Chorus,
    Bridge,
    Tab,
    Plain,
    /// `start_of_<anything else>`, kept by name.
    Custom(String),
}

impl SectionKind {
    /// Maps an environment suffix (`chorus` in `start_of_chorus`) to a kind.
    pub fn from_env(name: &str) -> SectionKind {
        match name {
            "verse" => SectionKind::Verse,
            "chorus" => SectionKind::Chorus,
            "bridge" => SectionKind::Bridge,
            "tab" => SectionKind::Tab,
            other => SectionKind::Custom(other.to_string()),
        }
    }

    /// The environment suffix used when serializing (`start_of_<this>`).
    pub fn env_name(&self) -> &str {
        match self {
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
            SectionKind::Tab => "tab",
            SectionKind::Plain => "plain",
            SectionKind::Custom(name) => name,
        }
    }
}

/// How a section came to exist; decides how it serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOrigin {
    /// Explicit `start_of_X` / `end_of_X` pair.
    Environment,
    /// Heading-shaped plain line (`Chorus:`, `Verse 2`). Best-effort.
    Heading,
    /// Opened implicitly by content with no marker.
    Implicit,
}

/// One entry of a section, in document order.
#[derive(Debug, Clone)]
pub enum Entry {
    Line(ContentLine),
    Comment { span: Span, text: String },
    Blank { span: Span },
}

/// A content line: ordered (chord, lyric-span) segments.
#[derive(Debug, Clone)]
pub struct ContentLine {
    pub id: NodeId,
    pub span: Span,
    pub segments: Vec<Segment>,
}

impl ContentLine {
    /// The lyric text of the line (all segments concatenated).
    pub fn lyric(&self) -> String {
        self.segments.iter().map(|seg| seg.lyric.as_str()).collect()
    }
}

/// A delimited run of content lines, comments and blanks.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: NodeId,
    pub kind: SectionKind,
    pub label: Option<String>,
    pub origin: SectionOrigin,
    pub span: Span,
    pub entries: Vec<Entry>,
}

/// Recoverable-syntax conditions, attached to the document rather than
/// aborting the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// `end_of_X` with no matching open `start_of_X`.
    UnmatchedSectionClose(String),
    /// `start_of_X` still open at end of input.
    UnterminatedSection(String),
    /// Directive name outside the known metadata vocabulary.
    UnknownDirective(String),
    /// Chord token that fell back to opaque.
    OpaqueChord,
    /// `[` with no closing `]` on the line.
    UnterminatedBracket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub span: Span,
}

/// Metadata directive names the engine recognizes. Anything else parses
/// fine but carries an [`WarningKind::UnknownDirective`] warning.
pub const KNOWN_METADATA: [&str; 12] = [
    "title",
    "subtitle",
    "artist",
    "composer",
    "album",
    "year",
    "key",
    "tempo",
    "time",
    "capo",
    "comment",
    "copyright",
];

/// A parsed chart. Owns all child nodes exclusively; constructed fresh by a
/// full parse, updated section-wise by the incremental controller, and
/// copied (never mutated) by the transposer.
#[derive(Debug, Clone, Default)]
pub struct SongDocument {
    /// All metadata directives in source order, duplicates included.
    pub metadata: Vec<Directive>,
    pub sections: Vec<Section>,
    pub warnings: Vec<ParseWarning>,
}

impl SongDocument {
    /// Last-one-wins metadata lookup.
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .rev()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata_value("title")
    }

    /// The declared key, parsed. `None` when absent or unparsable.
    pub fn key(&self) -> Option<Key> {
        self.metadata_value("key").and_then(Key::parse)
    }

    /// The section whose span contains `offset`.
    pub fn section_at(&self, offset: usize) -> Option<&Section> {
        self.sections.iter().find(|s| s.span.contains(offset))
    }

    /// The content line whose span contains `offset`.
    pub fn line_at(&self, offset: usize) -> Option<&ContentLine> {
        self.section_at(offset)?.entries.iter().find_map(|e| match e {
            Entry::Line(line) if line.span.contains(offset) => Some(line),
            _ => None,
        })
    }

    /// Structural equality: same metadata, sections, entries, chords and
    /// lyrics, ignoring node identities and byte spans. This is the
    /// equality the round-trip and incremental laws are stated in.
    pub fn same_structure(&self, other: &SongDocument) -> bool {
        fn directive_eq(a: &Directive, b: &Directive) -> bool {
            a.name == b.name && a.value == b.value
        }
        fn entry_eq(a: &Entry, b: &Entry) -> bool {
            match (a, b) {
                (Entry::Line(a), Entry::Line(b)) => {
                    a.segments.len() == b.segments.len()
                        && a.segments.iter().zip(&b.segments).all(|(sa, sb)| {
                            sa.lyric == sb.lyric
                                && match (&sa.chord, &sb.chord) {
                                    (Some(ca), Some(cb)) => ca == cb,
                                    (None, None) => true,
                                    _ => false,
                                }
                        })
                }
                (Entry::Comment { text: a, .. }, Entry::Comment { text: b, .. }) => a == b,
                (Entry::Blank { .. }, Entry::Blank { .. }) => true,
                _ => false,
            }
        }
        fn section_eq(a: &Section, b: &Section) -> bool {
            a.kind == b.kind
                && a.label == b.label
                && a.origin == b.origin
                && a.entries.len() == b.entries.len()
                && a.entries.iter().zip(&b.entries).all(|(x, y)| entry_eq(x, y))
        }

        self.metadata.len() == other.metadata.len()
            && self
                .metadata
                .iter()
                .zip(&other.metadata)
                .all(|(a, b)| directive_eq(a, b))
            && self.sections.len() == other.sections.len()
            && self
                .sections
                .iter()
                .zip(&other.sections)
                .all(|(a, b)| section_eq(a, b))
    }
}
